//! Seeded synthetic bar series for tests and benches.

use crate::domain::Bar;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `days` daily bars as a seeded random walk starting at 100.
///
/// Same seed, same series — callers rely on this for reproducible tests
/// and benches. Dates are consecutive calendar days from 2020-01-02.
pub fn synthetic_bars(symbol: &str, days: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2020, 1, 2).expect("valid date");
    let mut close = 100.0_f64;

    (0..days)
        .map(|i| {
            let open = close * (1.0 + rng.gen_range(-0.01..0.01));
            let drift: f64 = rng.gen_range(-0.02..0.02);
            close = (open * (1.0 + drift)).max(1.0);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = (open.min(close) * (1.0 - rng.gen_range(0.0..0.01))).max(0.5);
            Bar {
                symbol: symbol.to_string(),
                date: start + Duration::days(i as i64),
                open,
                high,
                low,
                close,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_series() {
        let a = synthetic_bars("SYN", 50, 7);
        let b = synthetic_bars("SYN", 50, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_series() {
        let a = synthetic_bars("SYN", 50, 7);
        let b = synthetic_bars("SYN", 50, 8);
        assert_ne!(a, b);
    }

    #[test]
    fn bars_are_sane_and_ascending() {
        let bars = synthetic_bars("SYN", 100, 42);
        assert_eq!(bars.len(), 100);
        for bar in &bars {
            assert!(bar.is_sane(), "insane bar: {bar:?}");
        }
        for pair in bars.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }
}
