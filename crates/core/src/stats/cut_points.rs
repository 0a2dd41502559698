//! Stratum boundaries
//!
//! Cut-points `c_1 < c_2 < ... < c_k` split the absorption-day axis into
//! `k + 1` strata: `(.., c_1]`, `(c_1, c_2]`, ..., `(c_k, ..)`. Only positive
//! cut-points strictly below the horizon are kept; anything else is dropped
//! without error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sorted, de-duplicated stratum boundaries
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CutPoints(Vec<u32>);

impl CutPoints {
    /// No boundaries, a single stratum
    pub fn none() -> Self {
        Self::default()
    }

    /// Keep the values of `candidates` in `(0, horizon)`
    pub fn new<I>(candidates: I, horizon: u32) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let kept: BTreeSet<u32> = candidates
            .into_iter()
            .filter(|&c| c > 0 && c < i64::from(horizon))
            .filter_map(|c| u32::try_from(c).ok())
            .collect();
        Self(kept.into_iter().collect())
    }

    /// Read whitespace-separated cut-points up to the first negative value
    ///
    /// Tokens that are not integers are skipped. Reading also ends when the
    /// input runs out.
    pub fn parse_until_negative(input: &str, horizon: u32) -> Self {
        let values = input
            .split_whitespace()
            .filter_map(|token| token.parse::<i64>().ok())
            .take_while(|&value| value >= 0);
        Self::new(values, horizon)
    }

    /// Boundaries in ascending order
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Number of boundaries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no boundaries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of strata (`len() + 1`)
    pub fn stratum_count(&self) -> usize {
        self.0.len() + 1
    }

    /// Stratum index of `value`
    ///
    /// Equal to the number of boundaries strictly below `value`, so a value
    /// sitting on a boundary belongs to the lower stratum.
    pub fn stratum_of(&self, value: u32) -> usize {
        self.0.partition_point(|&c| c < value)
    }

    /// Exclusive lower and inclusive upper bound of stratum `index`
    pub fn bounds(&self, index: usize) -> (Option<u32>, Option<u32>) {
        let lower = index.checked_sub(1).and_then(|i| self.0.get(i).copied());
        let upper = self.0.get(index).copied();
        (lower, upper)
    }
}
