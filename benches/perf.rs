use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};

use cornercast::context::ContextSignals;
use cornercast::engine::{self, EngineConfig};
use cornercast::match_log::{MatchLog, MatchRecord};
use cornercast::simulate;

fn synthetic_log(teams: usize, rounds: usize) -> MatchLog {
    let mut rows = Vec::new();
    let mut day = 0u32;
    for round in 0..rounds {
        for i in 0..teams {
            let j = (i + round + 1) % teams;
            if i == j {
                continue;
            }
            day += 1;
            rows.push(MatchRecord {
                date: NaiveDate::from_ymd_opt(2024, 8, 1)
                    .expect("valid date")
                    .checked_add_days(chrono::Days::new(day as u64))
                    .expect("valid offset"),
                home_team: format!("Team {i}"),
                away_team: format!("Team {j}"),
                referee: format!("Ref {}", i % 5),
                home_goals: (i % 4) as u32,
                away_goals: (j % 3) as u32,
                home_shots: 10 + (i % 6) as u32,
                away_shots: 9 + (j % 5) as u32,
                home_shots_on_target: 4,
                away_shots_on_target: 3,
                home_corners: 4 + (i % 5) as u32,
                away_corners: 3 + (j % 4) as u32,
                home_fouls: 9 + (i % 4) as u32,
                away_fouls: 10 + (j % 3) as u32,
                home_yellows: (i % 3) as u32,
                away_yellows: (j % 3) as u32,
                home_reds: 0,
                away_reds: (j % 7 == 0) as u32,
            });
        }
    }
    MatchLog::new(rows)
}

fn bench_simulate(c: &mut Criterion) {
    c.bench_function("simulate_counts_4000", |b| {
        b.iter(|| simulate::simulate_counts(black_box(10.4), 4000, Some(7)))
    });
    c.bench_function("exceedance_three_lines", |b| {
        let samples = simulate::simulate_counts(10.4, 4000, Some(7));
        b.iter(|| {
            for t in [8.5, 9.5, 10.5] {
                black_box(simulate::exceedance(&samples, t));
            }
        })
    });
}

fn bench_predict(c: &mut Criterion) {
    let log = synthetic_log(20, 38);
    let cfg = EngineConfig::default();
    let signals = ContextSignals::default();
    c.bench_function("predict_full_season_log", |b| {
        b.iter(|| {
            engine::predict(
                black_box(&log),
                "Team 3",
                "Team 11",
                Some("Ref 2"),
                &signals,
                &cfg,
                Some(42),
            )
            .expect("prediction")
        })
    });
}

criterion_group!(benches, bench_simulate, bench_predict);
criterion_main!(benches);
