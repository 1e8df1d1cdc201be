use serde::{Deserialize, Serialize};

/// Competitive weight of the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    Normal,
    Derby,
    DeadRubber,
}

/// Live scoreboard state, home perspective.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameState {
    pub minute: u32,
    /// Home goals minus away goals.
    pub score_diff: i32,
}

/// Independently-sourced, independently-optional signals. Anything absent
/// contributes nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSignals {
    pub precipitation_mm: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Explicit derby flag. `None` means "resolve from the rivalry table".
    pub derby: Option<bool>,
    pub importance: Option<Importance>,
    pub missing_key_defender: bool,
    pub game_state: Option<GameState>,
}

/// Tunable thresholds and magnitudes for the resolver. All multipliers and
/// additives are plain constants, overridable through the engine config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextTuning {
    pub rain_threshold_mm: f64,
    pub rain_corner_bonus: f64,
    pub wind_threshold: f64,
    pub wind_corner_penalty: f64,
    pub derby_card_bonus: f64,
    pub missing_defender_card_bonus: f64,
    pub importance_card_bonus: f64,
    pub dead_rubber_corner_penalty: f64,
    /// Game state only matters once the match has settled.
    pub game_state_min_minute: u32,
    pub chase_corner_bonus: f64,
    pub decided_corner_penalty: f64,
    pub corner_mult_min: f64,
    pub corner_mult_max: f64,
}

impl Default for ContextTuning {
    fn default() -> Self {
        Self {
            rain_threshold_mm: 1.0,
            rain_corner_bonus: 0.08,
            wind_threshold: 25.0,
            wind_corner_penalty: 0.06,
            derby_card_bonus: 0.8,
            missing_defender_card_bonus: 0.4,
            importance_card_bonus: 0.3,
            dead_rubber_corner_penalty: 0.05,
            game_state_min_minute: 15,
            chase_corner_bonus: 0.8,
            decided_corner_penalty: 0.6,
            corner_mult_min: 0.70,
            corner_mult_max: 1.40,
        }
    }
}

/// Combined adjustment the prediction formula applies on top of the
/// profile-derived base rates.
#[derive(Debug, Clone, Copy)]
pub struct ContextAdjust {
    pub corner_mult: f64,
    pub corner_add: f64,
    pub card_add: f64,
}

impl ContextAdjust {
    pub fn neutral() -> Self {
        Self {
            corner_mult: 1.0,
            corner_add: 0.0,
            card_add: 0.0,
        }
    }
}

/// Fold the optional signals into multiplicative/additive adjustments.
/// `derby` is the already-resolved flag (explicit signal or rivalry-table
/// membership); everything else comes straight off `signals`.
pub fn resolve(signals: &ContextSignals, derby: bool, cfg: &ContextTuning) -> ContextAdjust {
    let mut adjust = ContextAdjust::neutral();

    // Rain means more clearances and scrambled defending; wind kills
    // crossing accuracy.
    if let Some(rain) = signals.precipitation_mm
        && rain > cfg.rain_threshold_mm
    {
        adjust.corner_mult += cfg.rain_corner_bonus;
    }
    if let Some(wind) = signals.wind_speed
        && wind > cfg.wind_threshold
    {
        adjust.corner_mult -= cfg.wind_corner_penalty;
    }

    if derby {
        adjust.card_add += cfg.derby_card_bonus;
    }
    if signals.missing_key_defender {
        adjust.card_add += cfg.missing_defender_card_bonus;
    }
    match signals.importance {
        Some(Importance::Derby) => adjust.card_add += cfg.importance_card_bonus,
        Some(Importance::DeadRubber) => adjust.corner_mult -= cfg.dead_rubber_corner_penalty,
        Some(Importance::Normal) | None => {}
    }

    if let Some(state) = signals.game_state
        && state.minute > cfg.game_state_min_minute
    {
        match state.score_diff.abs() {
            0 => {}
            // One-goal game: somebody is chasing, corners pile up.
            1 => adjust.corner_add += cfg.chase_corner_bonus,
            // Decided game: tempo drops.
            _ => adjust.corner_add -= cfg.decided_corner_penalty,
        }
    }

    adjust.corner_mult = adjust
        .corner_mult
        .clamp(cfg.corner_mult_min, cfg.corner_mult_max);
    adjust
}
