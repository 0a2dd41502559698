//! Random draws used by the daily update
//!
//! Poisson counts are undefined for a zero mean in `rand_distr`; a zero mean is
//! a legitimate configuration here (quiet seasons, disabled growth) and always
//! yields zero.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use tracing::warn;

/// Largest mean a configuration may ask a Poisson draw for
pub const MAX_POISSON_MEAN: f64 = 1.0e12;

/// Poisson sampler that accepts a zero mean
#[derive(Debug, Clone)]
pub enum PoissonDraw {
    /// Mean of zero or below, always 0
    Zero,
    /// Regular Poisson distribution
    Positive(Poisson<f64>),
}

impl PoissonDraw {
    /// Build a sampler for `mean`
    ///
    /// Non-positive and non-finite means collapse to [`PoissonDraw::Zero`].
    #[must_use]
    pub fn new(mean: f64) -> Self {
        if !(mean.is_finite() && mean > 0.0) {
            return PoissonDraw::Zero;
        }
        match Poisson::new(mean) {
            Ok(dist) => PoissonDraw::Positive(dist),
            Err(err) => {
                warn!("Poisson mean {mean} rejected ({err}), drawing zero instead");
                PoissonDraw::Zero
            }
        }
    }

    /// Draw one count
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match self {
            PoissonDraw::Zero => 0,
            PoissonDraw::Positive(dist) => dist.sample(rng) as u64,
        }
    }
}

/// Scale used to turn a fractional daily mean into an integer Poisson count
pub const VOLUME_RESOLUTION: f64 = 1000.0;

/// Sampler for a fractional daily volume change with mean `daily_mean`
///
/// The count is drawn with mean `1000 * daily_mean` and divided back down, so
/// volumes move in steps of 0.001.
#[derive(Debug, Clone)]
pub struct VolumeDraw(PoissonDraw);

impl VolumeDraw {
    /// Sampler for `daily_mean`
    #[must_use]
    pub fn new(daily_mean: f64) -> Self {
        VolumeDraw(PoissonDraw::new(daily_mean * VOLUME_RESOLUTION))
    }

    /// Draw one volume change
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.0.sample(rng) as f64 / VOLUME_RESOLUTION
    }
}
