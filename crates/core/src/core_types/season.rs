//! Seasonal cycle
//!
//! The year is split into four equal-length seasons. Each season shifts the
//! daily leaf-fall and leaf-growth means and sets the base ignition rate. The
//! season is a pure function of the day index and carries no history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four seasons, in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Leaf growth peaks, fires are rare
    Spring,
    /// Moderate growth and fire risk
    Summer,
    /// Heavy leaf fall, highest fire risk
    Autumn,
    /// Dormant
    Winter,
}

impl Season {
    /// All seasons in cycle order
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    /// Season in effect on `day` when each season lasts `season_length` days
    ///
    /// A zero season length pins the cycle to spring.
    #[must_use]
    pub fn for_day(day: u32, season_length: u32) -> Self {
        if season_length == 0 {
            return Season::Spring;
        }
        Self::ALL[((day / season_length) % 4) as usize]
    }

    /// Position of this season in [`Season::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Autumn => 2,
            Season::Winter => 3,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        };
        f.write_str(name)
    }
}

/// Per-season adjustments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonParams {
    /// Added to the average daily leaf fall
    pub leaf_fall_inc: f64,
    /// Added to the average daily leaf growth
    pub leaf_growth_inc: f64,
    /// Base probability of a cell igniting on any day of the season
    pub fire_base_rate: f64,
}

impl SeasonParams {
    /// Construct from the three seasonal adjustments
    pub const fn new(leaf_fall_inc: f64, leaf_growth_inc: f64, fire_base_rate: f64) -> Self {
        Self {
            leaf_fall_inc,
            leaf_growth_inc,
            fire_base_rate,
        }
    }

    /// Reference seasonal table, indexed by [`Season::index`]
    pub const fn reference_table() -> [SeasonParams; 4] {
        [
            SeasonParams::new(0.001, 0.005, 0.001),
            SeasonParams::new(0.001, 0.001, 0.002),
            SeasonParams::new(0.005, 0.000, 0.008),
            SeasonParams::new(0.000, 0.000, 0.004),
        ]
    }

    /// Seasonal table with every adjustment and base rate at zero
    pub const fn quiet_table() -> [SeasonParams; 4] {
        [SeasonParams::new(0.0, 0.0, 0.0); 4]
    }
}
