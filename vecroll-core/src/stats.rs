//! Summary statistics of returns and episode lengths.
use crate::record::{Record, RecordValue};
use ndarray::{Array1, ArrayView1};

/// Mean and population standard deviation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    /// Arithmetic mean.
    pub mean: f32,

    /// Standard deviation with divisor `n`.
    pub std: f32,
}

impl Stats {
    /// Computes the mean and the population standard deviation of `values`.
    ///
    /// Values are not filtered: a single NaN makes both statistics NaN, and an
    /// empty input gives NaN.
    pub fn population<'a>(values: impl Into<ArrayView1<'a, f32>>) -> Self {
        let values = values.into();
        let n = values.len() as f64;
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = values
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Self {
            mean: mean as f32,
            std: var.sqrt() as f32,
        }
    }
}

/// Episode lengths from termination steps.
///
/// A `done_at` of `0` means no termination was observed, so the instance ran the
/// full budget of `n_steps`.
pub fn episode_lengths(done_at: ArrayView1<usize>, n_steps: usize) -> Array1<f32> {
    done_at.mapv(|d| if d == 0 { n_steps as f32 } else { d as f32 })
}

/// Statistics of one episode batch or of a whole evaluation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeStats {
    /// Statistics of returns.
    pub ret: Stats,

    /// Statistics of episode lengths.
    pub length: Stats,
}

impl EpisodeStats {
    /// Computes statistics over all instances.
    pub fn compute(returns: ArrayView1<f32>, done_at: ArrayView1<usize>, n_steps: usize) -> Self {
        Self {
            ret: Stats::population(returns),
            length: Stats::population(&episode_lengths(done_at, n_steps)),
        }
    }

    /// Converts into a [`Record`] with keys prefixed by `prefix`.
    pub fn to_record(&self, prefix: &str) -> Record {
        Record::from_slice(&[
            (format!("{}mean_return", prefix), RecordValue::Scalar(self.ret.mean)),
            (format!("{}std_return", prefix), RecordValue::Scalar(self.ret.std)),
            (
                format!("{}avg_episode_length", prefix),
                RecordValue::Scalar(self.length.mean),
            ),
            (
                format!("{}std_episode_length", prefix),
                RecordValue::Scalar(self.length.std),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_population_std() {
        let s = Stats::population(&array![2.0f32, 4.0, 6.0]);
        assert_eq!(s.mean, 4.0);
        assert!((s.std - 1.632_993).abs() < 1e-5);
    }

    #[test]
    fn test_nan_propagates() {
        let s = Stats::population(&array![1.0f32, f32::NAN]);
        assert!(s.mean.is_nan());
        assert!(s.std.is_nan());
    }

    #[test]
    fn test_sentinel_counts_as_full_budget() {
        let lengths = episode_lengths(array![0usize, 3, 10].view(), 10);
        assert_eq!(lengths, array![10.0f32, 3.0, 10.0]);
    }

    #[test]
    fn test_record_keys() {
        let stats = EpisodeStats::compute(
            array![1.0f32, 3.0].view(),
            array![2usize, 0].view(),
            4,
        );
        let record = stats.to_record("overall/");

        assert_eq!(record.get_scalar("overall/mean_return").unwrap(), 2.0);
        assert_eq!(record.get_scalar("overall/std_return").unwrap(), 1.0);
        assert_eq!(record.get_scalar("overall/avg_episode_length").unwrap(), 3.0);
        assert_eq!(record.get_scalar("overall/std_episode_length").unwrap(), 1.0);
    }
}
