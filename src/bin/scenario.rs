use std::fs;
use std::path::PathBuf;

use cornercast::context::ContextSignals;
use cornercast::engine::{self, EngineConfig};
use cornercast::match_log::{MatchLog, MatchRecord};

#[derive(Debug, serde::Deserialize)]
struct ScenarioCase {
    matches: Vec<MatchRecord>,
    home: String,
    away: String,
    #[serde(default)]
    referee: Option<String>,
    #[serde(default)]
    signals: ContextSignals,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    config: Option<EngineConfig>,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/scenario_case.json"));

    let raw = fs::read_to_string(&path)?;
    let case: ScenarioCase = serde_json::from_str(&raw)?;

    // This binary is intentionally simple: it loads one snapshot from disk and
    // prints the model output. No network, useful for tuning iterations.
    let log = MatchLog::new(case.matches);
    let cfg = case.config.unwrap_or_default();
    let result = engine::predict(
        &log,
        &case.home,
        &case.away,
        case.referee.as_deref(),
        &case.signals,
        &cfg,
        case.seed,
    )?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} vs {}", result.home_team, result.away_team);
    println!("Expected corners: {:.2}", result.expected_corners);
    println!("Expected cards:   {:.2}", result.expected_cards);
    for row in &result.corners {
        println!(
            "corners over {:.1}: {:.1}% (fair {:.2})",
            row.threshold, row.probability, row.fair_odds
        );
    }
    for row in &result.cards {
        println!(
            "cards over {:.1}: {:.1}% (fair {:.2})",
            row.threshold, row.probability, row.fair_odds
        );
    }

    Ok(())
}
