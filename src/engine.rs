use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::{self, ContextSignals, ContextTuning};
use crate::match_log::{MatchLog, Role};
use crate::referee::{self, RefereeProfile};
use crate::simulate;
use crate::tactics::{self, Style, TacticalProfile};
use crate::team_form::{self, TeamProfile};

#[derive(Debug, Error)]
pub enum PredictError {
    /// The one failure the engine propagates: with no history at all there is
    /// nothing to anchor an estimate on, and fabricating one from defaults
    /// alone would be worse than refusing.
    #[error("match log is empty, no prediction possible")]
    EmptyMatchLog,
}

/// Every tunable constant of the scoring formula in one place. The numeric
/// values are hand-tuned, not fitted; the point of keeping them here is that
/// none of them hides inside the formula as a magic number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Recency window N for team profiles.
    pub window: usize,
    /// Monte Carlo draw count S.
    pub samples: usize,
    /// Flat league additive on top of the profile-derived corner rate.
    pub league_corner_baseline: f64,
    /// Combined foul count divided by this gives the base card rate.
    pub fouls_per_card: f64,
    /// Poisson rates never drop below this.
    pub rate_floor: f64,
    pub width_panic_bonus: f64,
    pub width_threshold: u8,
    pub panic_threshold: u8,
    pub possession_low_block_bonus: f64,
    pub aerial_bonus: f64,
    pub aerial_threshold: u8,
    /// Friction multiplier slope per point of combined aggression above 5.
    pub friction_per_aggression: f64,
    pub corner_thresholds: Vec<f64>,
    pub card_thresholds: Vec<f64>,
    pub context: ContextTuning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: 8,
            samples: simulate::DEFAULT_SAMPLES,
            league_corner_baseline: 1.0,
            fouls_per_card: 6.5,
            rate_floor: 0.05,
            width_panic_bonus: 0.12,
            width_threshold: 6,
            panic_threshold: 6,
            possession_low_block_bonus: 0.10,
            aerial_bonus: 0.08,
            aerial_threshold: 6,
            friction_per_aggression: 0.05,
            corner_thresholds: vec![8.5, 9.5, 10.5],
            card_thresholds: vec![3.5, 4.5, 5.5],
            context: ContextTuning::default(),
        }
    }
}

/// Load overrides from a JSON file, silently keeping defaults when the file
/// is absent or unreadable. Same contract as the cached-params loaders
/// elsewhere: a bad config never blocks a prediction.
pub fn load_config(path: &Path) -> EngineConfig {
    let Ok(raw) = fs::read_to_string(path) else {
        return EngineConfig::default();
    };
    serde_json::from_str::<EngineConfig>(&raw).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ThresholdProbability {
    pub threshold: f64,
    /// Exceedance probability in percent.
    pub probability: f64,
    pub fair_odds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub home_team: String,
    pub away_team: String,
    pub expected_corners: f64,
    pub expected_cards: f64,
    pub corners: Vec<ThresholdProbability>,
    pub cards: Vec<ThresholdProbability>,
    pub home_form: TeamProfile,
    pub away_form: TeamProfile,
    pub referee: RefereeProfile,
    pub derby: bool,
    pub samples: usize,
    pub seed: Option<u64>,
}

/// Sole public entry point of the engine. Pure with respect to the snapshot:
/// identical inputs (including seed) give an identical result.
pub fn predict(
    log: &MatchLog,
    home: &str,
    away: &str,
    referee_name: Option<&str>,
    signals: &ContextSignals,
    cfg: &EngineConfig,
    seed: Option<u64>,
) -> Result<PredictionResult, PredictError> {
    if log.is_empty() {
        return Err(PredictError::EmptyMatchLog);
    }

    let home_form = team_form::team_profile(log, home, Role::Home, cfg.window);
    let away_form = team_form::team_profile(log, away, Role::Away, cfg.window);
    let referee = match referee_name {
        Some(name) => referee::referee_profile(log, name),
        None => RefereeProfile::neutral("unassigned"),
    };

    let tac_home = tactics::lookup(&home_form.team);
    let tac_away = tactics::lookup(&away_form.team);
    let derby = signals
        .derby
        .unwrap_or_else(|| tactics::is_derby(&home_form.team, &away_form.team));
    let adjust = context::resolve(signals, derby, &cfg.context);

    let expected_corners = expected_corners(&home_form, &away_form, &tac_home, &tac_away, &adjust, cfg);
    let expected_cards = expected_cards(&home_form, &away_form, &referee, &tac_home, &tac_away, &adjust, cfg);

    // One sample set per market, reused across every threshold so the lines
    // of a report cannot contradict each other. The card stream gets a
    // perturbed seed to keep it independent of the corner stream.
    let corner_samples = simulate::simulate_counts(expected_corners, cfg.samples, seed);
    let card_samples = simulate::simulate_counts(expected_cards, cfg.samples, seed.map(|s| s ^ 0xC0DE));

    let corners = threshold_table(&corner_samples, &cfg.corner_thresholds);
    let cards = threshold_table(&card_samples, &cfg.card_thresholds);

    Ok(PredictionResult {
        home_team: home_form.team.clone(),
        away_team: away_form.team.clone(),
        expected_corners,
        expected_cards,
        corners,
        cards,
        home_form,
        away_form,
        referee,
        derby,
        samples: cfg.samples,
        seed,
    })
}

/// Symmetric attack-vs-defense geometry: each side's own corner rate averaged
/// with what the opponent concedes, summed over both sides, plus the league
/// baseline, then shaped by the tactical and context multipliers.
pub fn expected_corners(
    home: &TeamProfile,
    away: &TeamProfile,
    tac_home: &TacticalProfile,
    tac_away: &TacticalProfile,
    adjust: &context::ContextAdjust,
    cfg: &EngineConfig,
) -> f64 {
    let home_rate = (home.corners_for + away.corners_against) / 2.0;
    let away_rate = (away.corners_for + home.corners_against) / 2.0;
    let base = home_rate + away_rate + cfg.league_corner_baseline;

    let rate = base * tactical_mismatch_mult(tac_home, tac_away, cfg) * adjust.corner_mult
        + adjust.corner_add;
    rate.max(cfg.rate_floor)
}

pub fn expected_cards(
    home: &TeamProfile,
    away: &TeamProfile,
    referee: &RefereeProfile,
    tac_home: &TacticalProfile,
    tac_away: &TacticalProfile,
    adjust: &context::ContextAdjust,
    cfg: &EngineConfig,
) -> f64 {
    let base = (home.fouls + away.fouls) / cfg.fouls_per_card.max(1.0);
    let rate = base * friction_mult(tac_home, tac_away, cfg) * referee.strictness + adjust.card_add;
    rate.max(cfg.rate_floor)
}

/// Starts at 1.0 and accrues fixed bonuses for stylistic mismatches that
/// historically produce corners.
fn tactical_mismatch_mult(
    tac_home: &TacticalProfile,
    tac_away: &TacticalProfile,
    cfg: &EngineConfig,
) -> f64 {
    let mut mult = 1.0;

    // Wide attack against a panicky back line means hurried clearances.
    if tac_home.width > cfg.width_threshold && tac_away.panic > cfg.panic_threshold {
        mult += cfg.width_panic_bonus;
    }
    if tac_away.width > cfg.width_threshold && tac_home.panic > cfg.panic_threshold {
        mult += cfg.width_panic_bonus;
    }

    // Territorial dominance pinned against a deep block gets walled into
    // deflections rather than clean entries.
    let possession_vs_block = (tac_home.style == Style::Possession
        && tac_away.style == Style::LowBlock)
        || (tac_away.style == Style::Possession && tac_home.style == Style::LowBlock);
    if possession_vs_block {
        mult += cfg.possession_low_block_bonus;
    }

    if tac_home.aerial > cfg.aerial_threshold && tac_away.aerial > cfg.aerial_threshold {
        mult += cfg.aerial_bonus;
    }

    mult
}

fn friction_mult(
    tac_home: &TacticalProfile,
    tac_away: &TacticalProfile,
    cfg: &EngineConfig,
) -> f64 {
    let combined = (tac_home.aggression as f64 + tac_away.aggression as f64) / 2.0;
    1.0 + cfg.friction_per_aggression * (combined - 5.0).max(0.0)
}

fn threshold_table(samples: &[u32], thresholds: &[f64]) -> Vec<ThresholdProbability> {
    thresholds
        .iter()
        .map(|&threshold| {
            let probability = simulate::exceedance(samples, threshold);
            ThresholdProbability {
                threshold,
                probability,
                fair_odds: simulate::fair_odds(probability),
            }
        })
        .collect()
}
