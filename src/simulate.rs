use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Poisson};
use rayon::prelude::*;

/// Default draw count. More samples tighten the estimate; results always
/// carry sampling noise at finite S.
pub const DEFAULT_SAMPLES: usize = 4000;
/// Returned by `fair_odds` when the probability is zero.
pub const FAIR_ODDS_SENTINEL: f64 = 999.0;

const PAR_CHUNK: usize = 2048;

/// Draw `samples` independent Poisson counts with mean `lambda`.
///
/// A `None` seed takes fresh entropy; passing `Some` makes the draw (and
/// everything computed from it) reproducible. Large requests are chunked
/// across the rayon pool with a per-chunk rng derived from the base seed, so
/// the output is identical whether or not the pool parallelizes.
pub fn simulate_counts(lambda: f64, samples: usize, seed: Option<u64>) -> Vec<u32> {
    if samples == 0 {
        return Vec::new();
    }
    // Poisson(0) only ever draws 0, and rand_distr rejects non-positive means.
    if lambda <= 0.0 {
        return vec![0; samples];
    }
    let base_seed = seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    let poisson = Poisson::new(lambda).expect("lambda checked positive");

    let chunks = samples.div_ceil(PAR_CHUNK);
    (0..chunks)
        .into_par_iter()
        .flat_map_iter(move |chunk| {
            let take = PAR_CHUNK.min(samples - chunk * PAR_CHUNK);
            let mut rng =
                StdRng::seed_from_u64(base_seed ^ (chunk as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            (0..take)
                .map(|_| poisson.sample(&mut rng) as u32)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Percent of samples strictly above `threshold`. One sample set should be
/// reused across all thresholds of a report so the lines stay internally
/// consistent.
pub fn exceedance(samples: &[u32], threshold: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let over = samples.iter().filter(|&&s| (s as f64) > threshold).count();
    over as f64 / samples.len() as f64 * 100.0
}

/// Fair decimal odd for a probability in percent: 100/P, with a fixed
/// sentinel instead of dividing by zero.
pub fn fair_odds(percent: f64) -> f64 {
    if percent <= 0.0 {
        FAIR_ODDS_SENTINEL
    } else {
        100.0 / percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lambda_draws_only_zeros() {
        let samples = simulate_counts(0.0, 500, Some(7));
        assert_eq!(samples.len(), 500);
        assert!(samples.iter().all(|&s| s == 0));
        assert_eq!(exceedance(&samples, 0.0), 0.0);
        assert_eq!(exceedance(&samples, 9.5), 0.0);
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let a = simulate_counts(9.8, 5000, Some(42));
        let b = simulate_counts(9.8, 5000, Some(42));
        assert_eq!(a, b);
        let c = simulate_counts(9.8, 5000, Some(43));
        assert_ne!(a, c);
    }

    #[test]
    fn exceedance_counts_strictly_above() {
        let samples = vec![8, 9, 10, 11];
        assert!((exceedance(&samples, 9.5) - 50.0).abs() < 1e-12);
        assert!((exceedance(&samples, 7.0) - 100.0).abs() < 1e-12);
        assert_eq!(exceedance(&[], 1.0), 0.0);
    }

    #[test]
    fn fair_odds_quarter_is_four() {
        assert_eq!(fair_odds(25.0), 4.0);
        assert_eq!(fair_odds(50.0), 2.0);
    }

    #[test]
    fn fair_odds_zero_hits_sentinel() {
        let odd = fair_odds(0.0);
        assert_eq!(odd, FAIR_ODDS_SENTINEL);
        assert!(!odd.is_nan());
    }

    #[test]
    fn sample_mean_tracks_lambda() {
        let lambda = 10.5;
        let samples = simulate_counts(lambda, 50_000, Some(1));
        let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64;
        assert!((mean - lambda).abs() < 0.15, "mean {mean} too far from {lambda}");
    }
}
