//! Normalized volume type for per-cell fuel and nutrient loads
//!
//! Both leaf volume and nutrient volume live on the closed interval `[0, 1]`.
//! Every constructor and arithmetic operation clamps to that interval, so a
//! `UnitVolume` can never hold an out-of-range value no matter how it was
//! produced.
//!
//! # Usage
//! ```
//! use forest_sim_core::core_types::UnitVolume;
//!
//! let leaves = UnitVolume::new(0.02);
//! assert_eq!(leaves - 0.06, UnitVolume::ZERO);
//! assert_eq!(UnitVolume::new(0.7) + 0.5, UnitVolume::FULL);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Sub, SubAssign};

/// A quantity clamped to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
#[repr(transparent)]
pub struct UnitVolume(f64);

impl UnitVolume {
    /// Empty cell
    pub const ZERO: UnitVolume = UnitVolume(0.0);
    /// Fully loaded cell
    pub const FULL: UnitVolume = UnitVolume(1.0);

    /// Create a new volume, clamping into `[0, 1]`
    ///
    /// NaN maps to zero.
    #[inline]
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        UnitVolume(value.clamp(0.0, 1.0))
    }

    /// Take the whole volume out, leaving zero behind
    #[inline]
    pub fn take(&mut self) -> UnitVolume {
        std::mem::take(self)
    }
}

impl Eq for UnitVolume {}

impl PartialOrd for UnitVolume {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnitVolume {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for UnitVolume {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl From<f64> for UnitVolume {
    fn from(value: f64) -> Self {
        UnitVolume::new(value)
    }
}

impl From<UnitVolume> for f64 {
    fn from(volume: UnitVolume) -> Self {
        volume.0
    }
}

impl Add<f64> for UnitVolume {
    type Output = UnitVolume;
    #[inline]
    fn add(self, rhs: f64) -> UnitVolume {
        UnitVolume::new(self.0 + rhs)
    }
}

impl Add for UnitVolume {
    type Output = UnitVolume;
    #[inline]
    fn add(self, rhs: UnitVolume) -> UnitVolume {
        UnitVolume::new(self.0 + rhs.0)
    }
}

impl AddAssign<f64> for UnitVolume {
    #[inline]
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}

impl AddAssign for UnitVolume {
    #[inline]
    fn add_assign(&mut self, rhs: UnitVolume) {
        *self = *self + rhs;
    }
}

impl Sub<f64> for UnitVolume {
    type Output = UnitVolume;
    #[inline]
    fn sub(self, rhs: f64) -> UnitVolume {
        UnitVolume::new(self.0 - rhs)
    }
}

impl SubAssign<f64> for UnitVolume {
    #[inline]
    fn sub_assign(&mut self, rhs: f64) {
        *self = *self - rhs;
    }
}

impl fmt::Display for UnitVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
