use serde::Serialize;

use crate::match_log::MatchLog;

/// Cards-per-match assumed for a referee with no history.
pub const DEFAULT_CARDS_PER_MATCH: f64 = 3.5;
/// Preselected when the caller leaves the referee blank and this name has
/// rows in the log; a common enough appointment to beat assuming neutral.
pub const PREFERRED_DEFAULT_REFEREE: &str = "M Oliver";
/// Floor for the league-wide average so strictness never divides by zero.
const MIN_LEAGUE_AVG: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct RefereeProfile {
    pub referee: String,
    pub sample_matches: usize,
    /// Average cards per match with reds weighted double.
    pub cards_per_match: f64,
    /// Ratio against the league-wide average; 1.0 is neutral.
    pub strictness: f64,
}

impl RefereeProfile {
    pub fn neutral(referee: &str) -> Self {
        Self {
            referee: referee.to_string(),
            sample_matches: 0,
            cards_per_match: DEFAULT_CARDS_PER_MATCH,
            strictness: 1.0,
        }
    }
}

/// Fallback appointment for fixtures with no referee named yet: the
/// preferred default pick, but only when the log actually has rows for him.
pub fn default_referee(log: &MatchLog) -> Option<String> {
    log.referee_names()
        .iter()
        .find(|r| **r == PREFERRED_DEFAULT_REFEREE)
        .map(|r| (*r).to_string())
}

/// Card-issuance rate for one referee normalized against the whole
/// repository. Unknown referees come back neutral; this never fails.
pub fn referee_profile(log: &MatchLog, referee: &str) -> RefereeProfile {
    let rows = log.matches_for_referee(referee);
    if rows.is_empty() {
        return RefereeProfile::neutral(referee);
    }

    let cards_per_match =
        rows.iter().map(|m| m.total_cards() as f64).sum::<f64>() / rows.len() as f64;

    let all = log.matches();
    let league_avg = if all.is_empty() {
        0.0
    } else {
        all.iter().map(|m| m.total_cards() as f64).sum::<f64>() / all.len() as f64
    };

    let strictness = if league_avg < MIN_LEAGUE_AVG {
        1.0
    } else {
        cards_per_match / league_avg
    };

    RefereeProfile {
        referee: referee.to_string(),
        sample_matches: rows.len(),
        cards_per_match,
        strictness,
    }
}
