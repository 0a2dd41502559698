//! Estimators over absorption-day samples
//!
//! The naive estimator reports the sample mean with a 95% confidence
//! half-width based on the Bessel-corrected sample standard deviation. The
//! stratified estimator in [`stratified`] keeps the same mean and replaces the
//! standard deviation with a size-weighted sum of per-stratum deviations.

pub mod cut_points;
pub mod stratified;

pub use cut_points::CutPoints;
pub use stratified::{StratifiedEstimate, Stratum};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-sided 95% normal quantile
pub const Z_95: f64 = 1.96;

/// Mean of `samples`, 0 for an empty sample
pub fn sample_mean(samples: &[u32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: u64 = samples.iter().map(|&t| u64::from(t)).sum();
    total as f64 / samples.len() as f64
}

/// Bessel-corrected sample standard deviation
///
/// Fewer than two samples carry no spread information and give 0.
pub fn sample_std_dev(samples: &[u32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let mean = sample_mean(samples);
    let sum_sq: f64 = samples
        .iter()
        .map(|&t| {
            let d = f64::from(t) - mean;
            d * d
        })
        .sum();
    (sum_sq / (samples.len() - 1) as f64).sqrt()
}

/// Confidence half-width `Z_95 * std_dev / sqrt(n)`, 0 for an empty sample
pub fn half_width(std_dev: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    Z_95 * std_dev / (n as f64).sqrt()
}

/// Mean with a 95% confidence half-width
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Estimate {
    /// Sample size
    pub n: usize,
    /// Sample mean
    pub mean: f64,
    /// Standard deviation the interval was built from
    pub std_dev: f64,
    /// 95% confidence half-width
    pub half_width: f64,
}

impl Estimate {
    /// Naive estimate from the raw sample
    pub fn from_samples(samples: &[u32]) -> Self {
        Self::with_std_dev(samples, sample_std_dev(samples))
    }

    /// Estimate with the sample's mean and an externally computed deviation
    pub fn with_std_dev(samples: &[u32], std_dev: f64) -> Self {
        Self {
            n: samples.len(),
            mean: sample_mean(samples),
            std_dev,
            half_width: half_width(std_dev, samples.len()),
        }
    }

    /// Lower and upper interval bounds
    pub fn interval(&self) -> (f64, f64) {
        (self.mean - self.half_width, self.mean + self.half_width)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*} +- {:.*}", p, self.mean, p, self.half_width),
            None => write!(f, "{} +- {}", self.mean, self.half_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_sample() {
        let samples = [2, 4, 4, 4, 5, 5, 7, 9];
        let est = Estimate::from_samples(&samples);
        assert_eq!(est.n, 8);
        assert_relative_eq!(est.mean, 5.0);
        // Sum of squared deviations is 32, over n - 1 = 7
        assert_relative_eq!(est.std_dev, (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(
            est.half_width,
            1.96 * (32.0_f64 / 7.0).sqrt() / 8.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_degenerate_samples() {
        let empty = Estimate::from_samples(&[]);
        assert_eq!(empty, Estimate::default());

        let single = Estimate::from_samples(&[42]);
        assert_eq!(single.n, 1);
        assert_eq!(single.mean, 42.0);
        assert_eq!(single.std_dev, 0.0);
        assert_eq!(single.half_width, 0.0);
    }

    #[test]
    fn test_interval_and_display() {
        let est = Estimate {
            n: 4,
            mean: 10.0,
            std_dev: 2.0,
            half_width: 1.5,
        };
        assert_eq!(est.interval(), (8.5, 11.5));
        assert_eq!(format!("{est}"), "10 +- 1.5");
        assert_eq!(format!("{est:.2}"), "10.00 +- 1.50");
    }

    #[test]
    fn test_large_days_do_not_overflow() {
        let samples = vec![u32::MAX; 3];
        assert_relative_eq!(sample_mean(&samples), f64::from(u32::MAX));
        assert_eq!(sample_std_dev(&samples), 0.0);
    }
}
