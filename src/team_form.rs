use serde::Serialize;

use crate::match_log::{MatchLog, Role, SideStats};

/// Neutral fallback profile, used when a team has no rows in the window.
/// Values sit near league-typical Premier League per-match figures.
pub const DEFAULT_CORNERS_FOR: f64 = 4.5;
pub const DEFAULT_CORNERS_AGAINST: f64 = 5.0;
pub const DEFAULT_FOULS: f64 = 10.5;
pub const DEFAULT_CARDS: f64 = 1.8;
pub const DEFAULT_SHOTS: f64 = 11.0;
const NEUTRAL_PRESSURE: f64 = 5.0;

/// Current-form indices for one team, recomputed per prediction request and
/// discarded afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct TeamProfile {
    pub team: String,
    pub role: Role,
    pub window: usize,
    /// Matches actually found inside the window (0 means defaults in use).
    pub sample_matches: usize,
    pub corners_for: f64,
    pub corners_against: f64,
    pub fouls: f64,
    pub cards: f64,
    pub shots: f64,
    /// Shots-on-target share scaled to 0..10; a crude finishing-pressure read.
    pub pressure: f64,
    /// Std deviation of corner counts in the window. Singleton windows give 0.
    pub volatility: f64,
    /// Average goals scored in the window.
    pub momentum: f64,
}

impl TeamProfile {
    /// One-line form read for reports: corner output with its spread (high
    /// volatility means the corner estimate deserves less trust), plus
    /// scoring momentum and finishing pressure.
    pub fn summary(&self) -> String {
        if self.sample_matches == 0 {
            return format!("{} no recent data, league-default profile", self.team);
        }
        format!(
            "{} corners {:.1}±{:.1}, momentum {:.1} goals, pressure {:.1}/10",
            self.team, self.corners_for, self.volatility, self.momentum, self.pressure
        )
    }

    pub fn neutral(team: &str, role: Role, window: usize) -> Self {
        Self {
            team: team.to_string(),
            role,
            window,
            sample_matches: 0,
            corners_for: DEFAULT_CORNERS_FOR,
            corners_against: DEFAULT_CORNERS_AGAINST,
            fouls: DEFAULT_FOULS,
            cards: DEFAULT_CARDS,
            shots: DEFAULT_SHOTS,
            pressure: NEUTRAL_PRESSURE,
            volatility: 0.0,
            momentum: 1.2,
        }
    }
}

/// Reduce the repository, filtered to one team and a recency window, into a
/// TeamProfile. Unknown teams and empty windows fall back to neutral defaults;
/// this never fails.
pub fn team_profile(log: &MatchLog, team: &str, role: Role, window: usize) -> TeamProfile {
    let window = window.max(1);
    let Some(resolved) = log.resolve_team(team) else {
        return TeamProfile::neutral(team, role, window);
    };

    let rows = log.matches_for(&resolved, role);
    // Most recent N; the log is oldest-first.
    let recent: Vec<SideStats> = rows
        .iter()
        .rev()
        .take(window)
        .map(|m| {
            if m.home_team == resolved {
                m.home_side()
            } else {
                m.away_side()
            }
        })
        .collect();

    if recent.is_empty() {
        return TeamProfile::neutral(&resolved, role, window);
    }

    let n = recent.len() as f64;
    let corners_for = recent.iter().map(|s| s.corners as f64).sum::<f64>() / n;
    let corners_against = recent.iter().map(|s| s.corners_conceded as f64).sum::<f64>() / n;
    let fouls = recent.iter().map(|s| s.fouls as f64).sum::<f64>() / n;
    let cards = recent
        .iter()
        .map(|s| (s.yellows + 2 * s.reds) as f64)
        .sum::<f64>()
        / n;
    let shots = recent.iter().map(|s| s.shots as f64).sum::<f64>() / n;
    let momentum = recent.iter().map(|s| s.goals as f64).sum::<f64>() / n;

    let sot = recent.iter().map(|s| s.shots_on_target as f64).sum::<f64>() / n;
    let pressure = if shots > 0.0 {
        (sot / shots * 10.0).clamp(0.0, 10.0)
    } else {
        NEUTRAL_PRESSURE
    };

    TeamProfile {
        team: resolved,
        role,
        window,
        sample_matches: recent.len(),
        corners_for,
        corners_against,
        fouls,
        cards,
        shots,
        pressure,
        volatility: stddev(recent.iter().map(|s| s.corners as f64)),
        momentum,
    }
}

/// Population standard deviation; 0 for empty or singleton inputs.
fn stddev(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}
