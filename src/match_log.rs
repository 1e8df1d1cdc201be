use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a fixture a team played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Home,
    Away,
    Either,
}

/// One finished historical fixture. Rows with missing required columns are
/// dropped at load time, so every field here is always populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub referee: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_shots: u32,
    pub away_shots: u32,
    pub home_shots_on_target: u32,
    pub away_shots_on_target: u32,
    pub home_corners: u32,
    pub away_corners: u32,
    pub home_fouls: u32,
    pub away_fouls: u32,
    pub home_yellows: u32,
    pub away_yellows: u32,
    pub home_reds: u32,
    pub away_reds: u32,
}

/// A match seen from one team's point of view, with opponent columns folded in.
#[derive(Debug, Clone, Copy)]
pub struct SideStats {
    pub goals: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub corners: u32,
    pub corners_conceded: u32,
    pub fouls: u32,
    pub yellows: u32,
    pub reds: u32,
}

impl MatchRecord {
    pub fn home_side(&self) -> SideStats {
        SideStats {
            goals: self.home_goals,
            shots: self.home_shots,
            shots_on_target: self.home_shots_on_target,
            corners: self.home_corners,
            corners_conceded: self.away_corners,
            fouls: self.home_fouls,
            yellows: self.home_yellows,
            reds: self.home_reds,
        }
    }

    pub fn away_side(&self) -> SideStats {
        SideStats {
            goals: self.away_goals,
            shots: self.away_shots,
            shots_on_target: self.away_shots_on_target,
            corners: self.away_corners,
            corners_conceded: self.home_corners,
            fouls: self.away_fouls,
            yellows: self.away_yellows,
            reds: self.away_reds,
        }
    }

    /// Card weight with reds counted double.
    pub fn total_cards(&self) -> u32 {
        self.home_yellows + self.away_yellows + 2 * (self.home_reds + self.away_reds)
    }
}

/// Immutable snapshot of the historical repository. The engine is a pure
/// function of one of these; refresh policy is the caller's concern.
#[derive(Debug, Clone)]
pub struct MatchLog {
    matches: Vec<MatchRecord>,
    fetched_at: DateTime<Utc>,
}

impl MatchLog {
    pub fn new(mut matches: Vec<MatchRecord>) -> Self {
        matches.sort_by(|a, b| a.date.cmp(&b.date));
        Self {
            matches,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_fetched_at(matches: Vec<MatchRecord>, fetched_at: DateTime<Utc>) -> Self {
        let mut log = Self::new(matches);
        log.fetched_at = fetched_at;
        log
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// All matches, oldest first.
    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Matches where `team` (an exact repository name) played in `role`,
    /// oldest first.
    pub fn matches_for(&self, team: &str, role: Role) -> Vec<&MatchRecord> {
        self.matches
            .iter()
            .filter(|m| match role {
                Role::Home => m.home_team == team,
                Role::Away => m.away_team == team,
                Role::Either => m.home_team == team || m.away_team == team,
            })
            .collect()
    }

    pub fn matches_for_referee(&self, referee: &str) -> Vec<&MatchRecord> {
        self.matches
            .iter()
            .filter(|m| m.referee == referee)
            .collect()
    }

    pub fn team_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for m in &self.matches {
            for name in [m.home_team.as_str(), m.away_team.as_str()] {
                if !out.contains(&name) {
                    out.push(name);
                }
            }
        }
        out
    }

    pub fn referee_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for m in &self.matches {
            if !out.contains(&m.referee.as_str()) {
                out.push(m.referee.as_str());
            }
        }
        out
    }

    /// Best-effort mapping from an externally-sourced team name to a
    /// repository name: exact match first, then a case-insensitive prefix
    /// scan over known names, first hit wins. The fallback can bind to the
    /// wrong team for very short or ambiguous inputs; callers that care
    /// should pass exact repository names.
    pub fn resolve_team(&self, name: &str) -> Option<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        let known = self.team_names();
        if let Some(hit) = known.iter().find(|t| **t == trimmed) {
            return Some((*hit).to_string());
        }

        let needle: String = trimmed.chars().take(4).collect::<String>().to_lowercase();
        known
            .iter()
            .find(|t| t.to_lowercase().contains(&needle))
            .map(|t| (*t).to_string())
    }
}
