use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};

use cornercast::context::{ContextSignals, GameState, Importance};
use cornercast::engine::{self, EngineConfig, PredictionResult};
use cornercast::referee;
use cornercast::stats_feed;

struct CliArgs {
    home: String,
    away: String,
    referee: Option<String>,
    signals: ContextSignals,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
    csv_url: Option<String>,
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = parse_args().context("bad arguments")?;

    let mut cfg = match &args.config_path {
        Some(path) => engine::load_config(path),
        None => match env::var("CORNERCAST_CONFIG") {
            Ok(path) => engine::load_config(&PathBuf::from(path)),
            Err(_) => EngineConfig::default(),
        },
    };
    if let Some(window) = env_usize("CORNERCAST_WINDOW") {
        cfg.window = window.max(1);
    }
    if let Some(samples) = env_usize("CORNERCAST_SAMPLES") {
        cfg.samples = samples.clamp(1000, 10_000);
    }

    let url = args
        .csv_url
        .clone()
        .or_else(|| env::var("CORNERCAST_CSV_URL").ok())
        .unwrap_or_else(|| stats_feed::DEFAULT_CSV_URL.to_string());

    let log = stats_feed::load_match_log(&url, stats_feed::DEFAULT_CACHE_TTL)
        .context("loading historical stats")?;

    let home = stats_feed::normalize_team(&args.home).to_string();
    let away = stats_feed::normalize_team(&args.away).to_string();

    // Appointments are announced late; until --referee is given, fall back to
    // the usual default pick if the log knows him, else stay neutral.
    let referee_name = args
        .referee
        .clone()
        .or_else(|| referee::default_referee(&log));

    let result = engine::predict(
        &log,
        &home,
        &away,
        referee_name.as_deref(),
        &args.signals,
        &cfg,
        args.seed,
    )?;

    print_report(&result);
    Ok(())
}

fn parse_args() -> Result<CliArgs> {
    let mut positional: Vec<String> = Vec::new();
    let mut referee = None;
    let mut signals = ContextSignals::default();
    let mut seed = None;
    let mut config_path = None;
    let mut csv_url = None;
    let mut minute: Option<u32> = None;
    let mut score_diff: Option<i32> = None;

    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--referee" => referee = Some(required_value(&mut it, "--referee")?),
            "--rain" => {
                signals.precipitation_mm =
                    Some(required_value(&mut it, "--rain")?.parse().context("--rain")?)
            }
            "--wind" => {
                signals.wind_speed =
                    Some(required_value(&mut it, "--wind")?.parse().context("--wind")?)
            }
            "--derby" => signals.derby = Some(true),
            "--no-derby" => signals.derby = Some(false),
            "--dead-rubber" => signals.importance = Some(Importance::DeadRubber),
            "--big-match" => signals.importance = Some(Importance::Derby),
            "--missing-defender" => signals.missing_key_defender = true,
            "--minute" => {
                minute = Some(
                    required_value(&mut it, "--minute")?
                        .parse()
                        .context("--minute")?,
                )
            }
            "--score-diff" => {
                score_diff = Some(
                    required_value(&mut it, "--score-diff")?
                        .parse()
                        .context("--score-diff")?,
                )
            }
            "--seed" => {
                seed = Some(required_value(&mut it, "--seed")?.parse().context("--seed")?)
            }
            "--config" => config_path = Some(PathBuf::from(required_value(&mut it, "--config")?)),
            "--url" => csv_url = Some(required_value(&mut it, "--url")?),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                return Err(anyhow!("unknown flag {other}"));
            }
            other => positional.push(other.to_string()),
        }
    }

    if positional.len() != 2 {
        print_usage();
        return Err(anyhow!("expected exactly two team names"));
    }
    if let (Some(minute), Some(score_diff)) = (minute, score_diff) {
        signals.game_state = Some(GameState { minute, score_diff });
    }

    let mut positional = positional.into_iter();
    Ok(CliArgs {
        home: positional.next().unwrap_or_default(),
        away: positional.next().unwrap_or_default(),
        referee,
        signals,
        seed,
        config_path,
        csv_url,
    })
}

fn required_value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    it.next().ok_or_else(|| anyhow!("{flag} needs a value"))
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.parse::<usize>().ok())
}

fn print_usage() {
    eprintln!(
        "usage: cornercast <home> <away> [--referee NAME] [--rain MM] [--wind SPEED]\n\
         \x20              [--derby|--no-derby] [--big-match|--dead-rubber] [--missing-defender]\n\
         \x20              [--minute M --score-diff D] [--seed N] [--config PATH] [--url CSV_URL]"
    );
}

fn print_report(result: &PredictionResult) {
    println!(
        "{} vs {}{}",
        result.home_team,
        result.away_team,
        if result.derby { "  [derby]" } else { "" }
    );
    println!(
        "  home ({} matches): {}",
        result.home_form.sample_matches,
        result.home_form.summary()
    );
    println!(
        "  away ({} matches): {}",
        result.away_form.sample_matches,
        result.away_form.summary()
    );
    if result.referee.sample_matches > 0 {
        println!(
            "  referee {}: {:.2} cards/match, strictness x{:.2}",
            result.referee.referee, result.referee.cards_per_match, result.referee.strictness
        );
    }
    println!();

    println!("Corners  expected {:.2}", result.expected_corners);
    for row in &result.corners {
        println!(
            "  over {:>4.1}  {:>5.1}%  fair {:>6.2}",
            row.threshold, row.probability, row.fair_odds
        );
    }
    if let Some(line) = result.corners.get(result.corners.len() / 2) {
        println!("  lean: {}", verdict(line.probability));
    }
    println!();

    println!("Cards    expected {:.2}", result.expected_cards);
    for row in &result.cards {
        println!(
            "  over {:>4.1}  {:>5.1}%  fair {:>6.2}",
            row.threshold, row.probability, row.fair_odds
        );
    }
    if let Some(line) = result.cards.get(result.cards.len() / 2) {
        println!("  lean: {}", verdict(line.probability));
    }
    println!();
    println!(
        "({} Poisson samples{}; probabilities carry sampling noise)",
        result.samples,
        match result.seed {
            Some(seed) => format!(", seed {seed}"),
            None => String::new(),
        }
    );
}

fn verdict(probability: f64) -> &'static str {
    if probability > 65.0 {
        "OVER looks live"
    } else if probability < 40.0 {
        "leans UNDER"
    } else {
        "no clear edge"
    }
}
