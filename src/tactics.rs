use serde::{Deserialize, Serialize};

/// Qualitative playing style, hand-assigned per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    HighPress,
    Possession,
    LowBlock,
    Direct,
    Counter,
    Unknown,
}

/// Curated stylistic attributes on a 0..10 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TacticalProfile {
    pub style: Style,
    pub width: u8,
    pub aggression: u8,
    pub panic: u8,
    pub aerial: u8,
}

impl TacticalProfile {
    pub const fn neutral() -> Self {
        Self {
            style: Style::Unknown,
            width: 5,
            aggression: 5,
            panic: 5,
            aerial: 5,
        }
    }
}

const fn profile(style: Style, width: u8, aggression: u8, panic: u8, aerial: u8) -> TacticalProfile {
    TacticalProfile {
        style,
        width,
        aggression,
        panic,
        aerial,
    }
}

// Hand-tuned table keyed by football-data.co.uk team names. Qualitative
// reads, not fitted values; revisit once a season.
static TABLE: &[(&str, TacticalProfile)] = &[
    ("Arsenal", profile(Style::Possession, 7, 5, 3, 7)),
    ("Aston Villa", profile(Style::HighPress, 6, 6, 5, 6)),
    ("Bournemouth", profile(Style::HighPress, 6, 7, 6, 5)),
    ("Brentford", profile(Style::Direct, 5, 6, 5, 8)),
    ("Brighton", profile(Style::Possession, 7, 5, 5, 4)),
    ("Chelsea", profile(Style::Possession, 6, 6, 5, 5)),
    ("Crystal Palace", profile(Style::Counter, 6, 6, 5, 6)),
    ("Everton", profile(Style::LowBlock, 4, 7, 6, 7)),
    ("Fulham", profile(Style::Possession, 6, 5, 5, 5)),
    ("Ipswich", profile(Style::Direct, 5, 6, 7, 6)),
    ("Leicester", profile(Style::Counter, 5, 5, 7, 5)),
    ("Liverpool", profile(Style::HighPress, 8, 6, 3, 6)),
    ("Man City", profile(Style::Possession, 7, 4, 2, 5)),
    ("Man United", profile(Style::Counter, 6, 6, 6, 6)),
    ("Newcastle", profile(Style::HighPress, 6, 7, 4, 7)),
    ("Nott'm Forest", profile(Style::LowBlock, 5, 6, 5, 7)),
    ("Southampton", profile(Style::Possession, 5, 5, 8, 4)),
    ("Spurs", profile(Style::HighPress, 7, 6, 6, 5)),
    ("West Ham", profile(Style::LowBlock, 5, 6, 6, 8)),
    ("Wolves", profile(Style::Counter, 5, 6, 6, 6)),
];

// Fixed rivalry pairs for derby detection, unordered.
static RIVALRIES: &[(&str, &str)] = &[
    ("Arsenal", "Spurs"),
    ("Arsenal", "Chelsea"),
    ("Chelsea", "Spurs"),
    ("Liverpool", "Everton"),
    ("Liverpool", "Man United"),
    ("Man City", "Man United"),
    ("Newcastle", "Sunderland"),
    ("West Ham", "Millwall"),
    ("Aston Villa", "Birmingham"),
    ("Crystal Palace", "Brighton"),
];

/// Total lookup: exact key, then case-insensitive containment either
/// direction, then the neutral profile. Never fails for any input string.
pub fn lookup(team: &str) -> TacticalProfile {
    let trimmed = team.trim();
    if trimmed.is_empty() {
        return TacticalProfile::neutral();
    }
    if let Some((_, p)) = TABLE.iter().find(|(name, _)| *name == trimmed) {
        return *p;
    }
    let lower = trimmed.to_lowercase();
    TABLE
        .iter()
        .find(|(name, _)| {
            let n = name.to_lowercase();
            n.contains(&lower) || lower.contains(&n)
        })
        .map(|(_, p)| *p)
        .unwrap_or_else(TacticalProfile::neutral)
}

/// True when the unordered pair appears in the rivalry set. Uses the same
/// loose containment matching as `lookup` so feed-name variants still hit.
pub fn is_derby(team_a: &str, team_b: &str) -> bool {
    RIVALRIES.iter().any(|(x, y)| {
        (name_matches(team_a, x) && name_matches(team_b, y))
            || (name_matches(team_a, y) && name_matches(team_b, x))
    })
}

fn name_matches(input: &str, known: &str) -> bool {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return false;
    }
    let known = known.to_lowercase();
    input == known || input.contains(&known) || known.contains(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_exact_hit() {
        let p = lookup("Liverpool");
        assert_eq!(p.style, Style::HighPress);
        assert_eq!(p.width, 8);
    }

    #[test]
    fn lookup_containment_either_direction() {
        // Feed variant containing the table key.
        assert_eq!(lookup("Liverpool FC").style, Style::HighPress);
        // Table key containing the input.
        assert_eq!(lookup("Forest").style, Style::LowBlock);
    }

    #[test]
    fn lookup_is_total() {
        for name in ["", "   ", "Real Madrid", "xXx", "1234"] {
            let p = lookup(name);
            assert_eq!(p.style, Style::Unknown);
            assert_eq!(p.width, 5);
        }
    }

    #[test]
    fn derby_detection_is_unordered() {
        assert!(is_derby("Liverpool", "Everton"));
        assert!(is_derby("Everton", "Liverpool"));
        assert!(is_derby("Manchester City", "Manchester United") || is_derby("Man City", "Man United"));
        assert!(!is_derby("Liverpool", "Chelsea"));
        assert!(!is_derby("", ""));
    }
}
