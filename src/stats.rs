//! Statistics computation for benchmark latency samples.

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("empty input: at least one value is required")]
    EmptySample,

    #[error("insufficient sample size: need at least {required} values, got {actual}")]
    InsufficientSample { required: usize, actual: usize },

    #[error("percentile {0} is outside [0, 100]")]
    PercentileOutOfRange(f64),

    #[error("value at index {index} is not a finite number")]
    NonFiniteValue { index: usize },

    #[error("mean of '{name}' is zero")]
    ZeroMean { name: String },
}

/// Descriptive statistics of one latency sample, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub stdev: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
}

impl StatsSummary {
    /// Coefficient of variation, stdev / mean as a percentage.
    pub fn coefficient_of_variation(&self) -> Result<f64> {
        if self.mean == 0.0 {
            return Err(StatsError::ZeroMean {
                name: self.name.clone(),
            });
        }
        Ok(self.stdev / self.mean * 100.0)
    }
}

fn validate(data: &[f64]) -> Result<()> {
    if data.is_empty() {
        return Err(StatsError::EmptySample);
    }
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(StatsError::NonFiniteValue { index }),
        None => Ok(()),
    }
}

fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let k = (n - 1) as f64 * p / 100.0;
    let f = k.floor() as usize;
    let c = (f + 1).min(n - 1);
    sorted[f] + (sorted[c] - sorted[f]) * (k - f as f64)
}

/// The `p`-th percentile of `data`, interpolating linearly between the two
/// closest order statistics. `data` does not need to be sorted.
pub fn percentile(data: &[f64], p: f64) -> Result<f64> {
    validate(data)?;
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::PercentileOutOfRange(p));
    }
    Ok(percentile_of_sorted(&sorted(data), p))
}

pub fn mean(data: &[f64]) -> Result<f64> {
    validate(data)?;
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

pub fn median(data: &[f64]) -> Result<f64> {
    validate(data)?;
    let sorted = sorted(data);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Sample standard deviation (N-1 denominator).
pub fn sample_stdev(data: &[f64]) -> Result<f64> {
    let mean = mean(data)?;
    if data.len() < 2 {
        return Err(StatsError::InsufficientSample {
            required: 2,
            actual: data.len(),
        });
    }
    let variance =
        data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    Ok(variance.sqrt())
}

pub fn summarize(name: impl Into<String>, data: &[f64]) -> Result<StatsSummary> {
    let stdev = sample_stdev(data)?;
    let sorted = sorted(data);

    Ok(StatsSummary {
        name: name.into(),
        count: data.len(),
        mean: mean(data)?,
        median: median(data)?,
        stdev,
        p95: percentile_of_sorted(&sorted, 95.0),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    })
}

/// How many times faster `candidate` is than `baseline`, as a ratio of means.
pub fn speedup(baseline: &StatsSummary, candidate: &StatsSummary) -> Result<f64> {
    if candidate.mean == 0.0 {
        return Err(StatsError::ZeroMean {
            name: candidate.name.clone(),
        });
    }
    Ok(baseline.mean / candidate.mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        assert!(close(percentile(&[1.0, 2.0, 3.0, 4.0], 50.0).unwrap(), 2.5));
        assert!(close(percentile(&[4.0, 1.0, 3.0, 2.0], 50.0).unwrap(), 2.5));
        assert!(close(percentile(&[10.0, 20.0], 95.0).unwrap(), 19.5));
    }

    #[test]
    fn percentile_bounds_are_min_and_max() {
        let data = [7.0, -3.0, 12.5, 0.0, 4.0];
        assert_eq!(percentile(&data, 0.0).unwrap(), -3.0);
        assert_eq!(percentile(&data, 100.0).unwrap(), 12.5);
    }

    #[test]
    fn percentile_of_single_value() {
        assert_eq!(percentile(&[42.0], 95.0).unwrap(), 42.0);
        assert_eq!(percentile(&[42.0], 100.0).unwrap(), 42.0);
    }

    #[test]
    fn percentile_rejects_bad_input() {
        assert_eq!(percentile(&[], 50.0), Err(StatsError::EmptySample));
        assert_eq!(
            percentile(&[1.0], 101.0),
            Err(StatsError::PercentileOutOfRange(101.0))
        );
        assert!(matches!(
            percentile(&[1.0], f64::NAN),
            Err(StatsError::PercentileOutOfRange(_))
        ));
        assert_eq!(
            percentile(&[1.0, f64::NAN], 50.0),
            Err(StatsError::NonFiniteValue { index: 1 })
        );
    }

    #[test]
    fn mean_median_stdev() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
        assert_eq!(sample_stdev(&[1.0, 2.0, 3.0]).unwrap(), 1.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
    }

    #[test]
    fn stdev_needs_two_values() {
        assert_eq!(sample_stdev(&[]), Err(StatsError::EmptySample));
        assert_eq!(
            sample_stdev(&[5.0]),
            Err(StatsError::InsufficientSample {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn summarize_fills_every_field() {
        let s = summarize("demo", &[3.0, 1.0, 2.0, 4.0]).unwrap();
        assert_eq!(s.name, "demo");
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.median, 2.5);
        assert!(close(s.p95, 3.85));
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!(close(s.stdev, (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn summarize_errors() {
        assert_eq!(summarize("empty", &[]), Err(StatsError::EmptySample));
        assert!(matches!(
            summarize("one", &[1.0]),
            Err(StatsError::InsufficientSample { actual: 1, .. })
        ));
    }

    #[test]
    fn speedup_is_reciprocal_when_swapped() {
        let a = summarize("a", &[100.0, 120.0, 110.0]).unwrap();
        let b = summarize("b", &[20.0, 25.0, 30.0]).unwrap();
        let ab = speedup(&a, &b).unwrap();
        let ba = speedup(&b, &a).unwrap();
        assert!(close(ab, 1.0 / ba));
        assert!(close(ab, 4.4));
    }

    #[test]
    fn zero_mean_is_an_error() {
        let zero = summarize("zero", &[-1.0, 1.0]).unwrap();
        let other = summarize("other", &[1.0, 2.0]).unwrap();
        assert!(matches!(
            speedup(&other, &zero),
            Err(StatsError::ZeroMean { .. })
        ));
        assert!(matches!(
            zero.coefficient_of_variation(),
            Err(StatsError::ZeroMean { .. })
        ));
    }

    #[test]
    fn coefficient_of_variation_ignores_scale() {
        let data = [10.0, 12.0, 9.0, 11.0, 13.0];
        let scaled: Vec<f64> = data.iter().map(|v| v * 37.5).collect();
        let cv = summarize("x", &data).unwrap().coefficient_of_variation().unwrap();
        let cv_scaled = summarize("kx", &scaled)
            .unwrap()
            .coefficient_of_variation()
            .unwrap();
        assert!((cv - cv_scaled).abs() < 1e-9);
    }
}
