//! Stratified variance reduction
//!
//! Post-processes an already recorded sample. Each stratum's Bessel-corrected
//! standard deviation is weighted by the stratum's share of the sample and
//! the weighted deviations are summed. With a single stratum the weight is 1
//! and the result is exactly the naive estimate.

use super::{sample_std_dev, CutPoints, Estimate};
use serde::{Deserialize, Serialize};

/// Summary of one stratum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stratum {
    /// Exclusive lower bound, `None` for the first stratum
    pub lower: Option<u32>,
    /// Inclusive upper bound, `None` for the last stratum
    pub upper: Option<u32>,
    /// Number of samples in the stratum
    pub size: usize,
    /// Sample standard deviation inside the stratum (0 below two members)
    pub std_dev: f64,
    /// Share of the whole sample
    pub weight: f64,
}

/// Stratified estimate with its per-stratum breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratifiedEstimate {
    /// Overall mean with the stratified deviation and half-width
    pub estimate: Estimate,
    /// One entry per stratum, in ascending order
    pub strata: Vec<Stratum>,
}

impl StratifiedEstimate {
    /// Partition `samples` by `cuts` and combine the per-stratum deviations
    pub fn compute(samples: &[u32], cuts: &CutPoints) -> Self {
        let mut buckets: Vec<Vec<u32>> = vec![Vec::new(); cuts.stratum_count()];
        for &value in samples {
            buckets[cuts.stratum_of(value)].push(value);
        }

        let n = samples.len();
        let strata: Vec<Stratum> = buckets
            .iter()
            .enumerate()
            .map(|(index, bucket)| {
                let (lower, upper) = cuts.bounds(index);
                let weight = if n == 0 {
                    0.0
                } else {
                    bucket.len() as f64 / n as f64
                };
                Stratum {
                    lower,
                    upper,
                    size: bucket.len(),
                    std_dev: sample_std_dev(bucket),
                    weight,
                }
            })
            .collect();

        let stratified_std: f64 = strata.iter().map(|s| s.std_dev * s.weight).sum();

        Self {
            estimate: Estimate::with_std_dev(samples, stratified_std),
            strata,
        }
    }
}
