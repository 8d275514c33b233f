use serde::{Deserialize, Serialize};

/// Descriptive statistics over a set of latency observations, in milliseconds
///
/// Percentiles are computed by linear interpolation between adjacent order statistics, see
/// [percentile]. The median is the 50th percentile so `median_ms == p50_ms` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub p999_ms: f64,
}

impl LatencySummary {
    /// Summarise a set of latencies
    ///
    /// Returns `None` if there are no observations. The input does not need to be sorted.
    pub fn from_latencies(latencies: &[f64]) -> Option<Self> {
        if latencies.is_empty() {
            return None;
        }

        let sorted = sorted_latencies(latencies);
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let p50 = percentile(&sorted, 50.0)?;

        Some(Self {
            min_ms: sorted[0],
            max_ms: sorted[sorted.len() - 1],
            mean_ms: mean,
            median_ms: p50,
            p50_ms: p50,
            p95_ms: percentile(&sorted, 95.0)?,
            p99_ms: percentile(&sorted, 99.0)?,
            p999_ms: percentile(&sorted, 99.9)?,
        })
    }
}

/// Copy and sort latencies in ascending order
pub fn sorted_latencies(latencies: &[f64]) -> Vec<f64> {
    let mut sorted = latencies.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// The `p`th percentile of `sorted`, for `p` in `[0, 100]`
///
/// The rank `p / 100 * (n - 1)` is interpolated linearly between the order statistics either
/// side of it. `sorted` must be in ascending order. Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(last);
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_input_has_no_summary() {
        assert_eq!(LatencySummary::from_latencies(&[]), None);
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn single_value_is_every_percentile() {
        let summary = LatencySummary::from_latencies(&[42.5]).unwrap();
        assert_eq!(summary.min_ms, 42.5);
        assert_eq!(summary.max_ms, 42.5);
        assert_eq!(summary.mean_ms, 42.5);
        assert_eq!(summary.median_ms, 42.5);
        assert_eq!(summary.p50_ms, 42.5);
        assert_eq!(summary.p95_ms, 42.5);
        assert_eq!(summary.p99_ms, 42.5);
        assert_eq!(summary.p999_ms, 42.5);
    }

    #[test]
    fn hand_computed_percentiles() {
        let latencies = (1..=100).map(|i| i as f64 * 10.0).rev().collect::<Vec<_>>();
        let summary = LatencySummary::from_latencies(&latencies).unwrap();

        assert_close(summary.min_ms, 10.0);
        assert_close(summary.max_ms, 1000.0);
        assert_close(summary.mean_ms, 505.0);
        // rank 49.5 between 500 and 510
        assert_close(summary.p50_ms, 505.0);
        // rank 94.05 between 950 and 960
        assert_close(summary.p95_ms, 950.5);
        // rank 98.01 between 990 and 1000
        assert_close(summary.p99_ms, 990.1);
        // rank 98.901 between 990 and 1000
        assert_close(summary.p999_ms, 999.01);
    }

    #[test]
    fn median_matches_p50_for_even_count() {
        let summary = LatencySummary::from_latencies(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.median_ms, summary.p50_ms);
        assert_close(summary.median_ms, 2.5);
    }

    #[test]
    fn percentiles_are_monotonic() {
        let latencies = [
            12.0, 55.3, 48.1, 1203.4, 51.0, 49.9, 10.0, 63.2, 980.0, 47.7, 52.2, 1500.0,
        ];
        let summary = LatencySummary::from_latencies(&latencies).unwrap();

        assert!(summary.min_ms <= summary.p50_ms);
        assert!(summary.p50_ms <= summary.p95_ms);
        assert!(summary.p95_ms <= summary.p99_ms);
        assert!(summary.p99_ms <= summary.p999_ms);
        assert!(summary.p999_ms <= summary.max_ms);
    }

    #[test]
    fn percentile_bounds() {
        let sorted = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile(&sorted, 100.0), Some(3.0));
        assert_eq!(percentile(&sorted, 150.0), Some(3.0));
    }
}
