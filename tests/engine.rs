use chrono::NaiveDate;

use cornercast::context::{ContextSignals, GameState};
use cornercast::engine::{self, EngineConfig, PredictError};
use cornercast::match_log::{MatchLog, MatchRecord};

fn record(day: u32, home: &str, away: &str, home_corners: u32, away_corners: u32) -> MatchRecord {
    MatchRecord {
        date: NaiveDate::from_ymd_opt(2025, 1, day).expect("valid day"),
        home_team: home.to_string(),
        away_team: away.to_string(),
        referee: "M Oliver".to_string(),
        home_goals: 1,
        away_goals: 1,
        home_shots: 12,
        away_shots: 10,
        home_shots_on_target: 4,
        away_shots_on_target: 3,
        home_corners,
        away_corners,
        home_fouls: 10,
        away_fouls: 10,
        home_yellows: 2,
        away_yellows: 2,
        home_reds: 0,
        away_reds: 0,
    }
}

/// Team A at home with a known corner history, Team B away conceding 6.0 per
/// match. Filler opponents keep the two windows independent.
fn scenario_log() -> MatchLog {
    let mut rows = Vec::new();
    let a_corners = [5, 6, 4, 7, 5, 6, 8, 4]; // mean 5.625
    for (i, corners) in a_corners.iter().enumerate() {
        rows.push(record(1 + i as u32, "Team A", "Filler FC", *corners, 4));
    }
    for i in 0..8 {
        rows.push(record(10 + i, "Host FC", "Team B", 6, 4));
    }
    MatchLog::new(rows)
}

#[test]
fn corner_expectation_matches_documented_formula() {
    let log = scenario_log();
    let cfg = EngineConfig::default();
    let result = engine::predict(
        &log,
        "Team A",
        "Team B",
        None,
        &ContextSignals::default(),
        &cfg,
        Some(1),
    )
    .expect("prediction");

    // Home side: (5.625 own + 6.0 conceded-by-B)/2. Away side: (4.0 + 4.0)/2.
    // Plus the league baseline; neither team is in the tactical table so all
    // multipliers are 1.0.
    let want = (5.625 + 6.0) / 2.0 + (4.0 + 4.0) / 2.0 + cfg.league_corner_baseline;
    assert!(
        (result.expected_corners - want).abs() < 1e-9,
        "got {} want {want}",
        result.expected_corners
    );
}

#[test]
fn predict_is_idempotent_with_fixed_seed() {
    let log = scenario_log();
    let cfg = EngineConfig::default();
    let signals = ContextSignals {
        precipitation_mm: Some(2.5),
        ..Default::default()
    };

    let a = engine::predict(&log, "Team A", "Team B", Some("M Oliver"), &signals, &cfg, Some(99))
        .expect("first run");
    let b = engine::predict(&log, "Team A", "Team B", Some("M Oliver"), &signals, &cfg, Some(99))
        .expect("second run");

    assert_eq!(a.expected_corners, b.expected_corners);
    assert_eq!(a.expected_cards, b.expected_cards);
    for (x, y) in a.corners.iter().zip(&b.corners) {
        assert_eq!(x.probability, y.probability);
        assert_eq!(x.fair_odds, y.fair_odds);
    }
    for (x, y) in a.cards.iter().zip(&b.cards) {
        assert_eq!(x.probability, y.probability);
    }
}

#[test]
fn empty_log_is_the_one_propagated_error() {
    let log = MatchLog::new(Vec::new());
    let err = engine::predict(
        &log,
        "Team A",
        "Team B",
        None,
        &ContextSignals::default(),
        &EngineConfig::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, PredictError::EmptyMatchLog));
}

#[test]
fn unknown_teams_still_produce_a_prediction() {
    let log = scenario_log();
    let result = engine::predict(
        &log,
        "Nowhere Town",
        "",
        Some("never refereed"),
        &ContextSignals::default(),
        &EngineConfig::default(),
        Some(5),
    )
    .expect("defaults should carry the prediction");

    assert_eq!(result.home_form.sample_matches, 0);
    assert_eq!(result.referee.strictness, 1.0);
    assert!(result.expected_corners > 0.0);
    assert!(result.expected_cards > 0.0);
}

#[test]
fn rain_never_decreases_expected_corners() {
    let log = scenario_log();
    let cfg = EngineConfig::default();
    let mut last = 0.0;
    for rain in [0.0, 0.5, 1.5, 4.0, 12.0] {
        let signals = ContextSignals {
            precipitation_mm: Some(rain),
            ..Default::default()
        };
        let result =
            engine::predict(&log, "Team A", "Team B", None, &signals, &cfg, Some(1)).unwrap();
        assert!(
            result.expected_corners >= last,
            "corners dropped when rain rose to {rain}"
        );
        last = result.expected_corners;
    }
}

#[test]
fn wind_never_increases_expected_corners() {
    let log = scenario_log();
    let cfg = EngineConfig::default();
    let mut last = f64::INFINITY;
    for wind in [0.0, 10.0, 26.0, 50.0] {
        let signals = ContextSignals {
            wind_speed: Some(wind),
            ..Default::default()
        };
        let result =
            engine::predict(&log, "Team A", "Team B", None, &signals, &cfg, Some(1)).unwrap();
        assert!(
            result.expected_corners <= last,
            "corners rose when wind rose to {wind}"
        );
        last = result.expected_corners;
    }
}

#[test]
fn late_one_goal_game_lifts_corners() {
    let log = scenario_log();
    let cfg = EngineConfig::default();
    let quiet = engine::predict(
        &log,
        "Team A",
        "Team B",
        None,
        &ContextSignals::default(),
        &cfg,
        Some(1),
    )
    .unwrap();

    let chasing = ContextSignals {
        game_state: Some(GameState {
            minute: 75,
            score_diff: -1,
        }),
        ..Default::default()
    };
    let live = engine::predict(&log, "Team A", "Team B", None, &chasing, &cfg, Some(1)).unwrap();
    assert!(live.expected_corners > quiet.expected_corners);
}

#[test]
fn derby_flag_raises_card_expectation() {
    let log = scenario_log();
    let cfg = EngineConfig::default();
    let base = engine::predict(
        &log,
        "Team A",
        "Team B",
        None,
        &ContextSignals::default(),
        &cfg,
        Some(1),
    )
    .unwrap();

    let derby = ContextSignals {
        derby: Some(true),
        ..Default::default()
    };
    let heated = engine::predict(&log, "Team A", "Team B", None, &derby, &cfg, Some(1)).unwrap();
    assert!(heated.expected_cards > base.expected_cards);
    assert!(heated.derby);
}

#[test]
fn prediction_result_serializes_for_export() {
    let log = scenario_log();
    let result = engine::predict(
        &log,
        "Team A",
        "Team B",
        Some("M Oliver"),
        &ContextSignals::default(),
        &EngineConfig::default(),
        Some(7),
    )
    .unwrap();

    let json = serde_json::to_value(&result).expect("serializes");
    assert_eq!(json["home_team"], "Team A");
    assert_eq!(json["referee"]["referee"], "M Oliver");
    assert!(json["corners"].as_array().is_some_and(|a| a.len() == 3));
    assert!(json["home_form"]["corners_for"].is_number());
}

#[test]
fn probabilities_stay_in_percent_range() {
    let log = scenario_log();
    let result = engine::predict(
        &log,
        "Team A",
        "Team B",
        Some("M Oliver"),
        &ContextSignals::default(),
        &EngineConfig::default(),
        Some(3),
    )
    .unwrap();

    for row in result.corners.iter().chain(&result.cards) {
        assert!((0.0..=100.0).contains(&row.probability));
        assert!(row.fair_odds >= 1.0);
    }
}
