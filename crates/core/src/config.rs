//! Static simulation configuration
//!
//! `SimulationConfig` is immutable for the life of a batch and shared by
//! reference with every trial. Everything that changes from day to day lives in
//! the per-trial [`SimulationState`](crate::simulation::SimulationState).
//!
//! The [`Default`] configuration is the reference parameter set: 50-year
//! horizon, weekly raking of 0.0001, 91-day seasons.

use crate::core_types::{Season, SeasonParams, UnitVolume, MAX_POISSON_MEAN, VOLUME_RESOLUTION};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// How the day's leaf fall combines with leaf growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallMode {
    /// Fallen leaves add to the standing fuel (delta = growth + fall)
    #[default]
    Add,
    /// Fallen leaves leave the canopy (delta = growth - fall)
    Subtract,
}

/// What the estimators do with trials that hit the horizon without absorbing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Leave timed-out trials out of the sample. They are still counted and
    /// reported so the survivorship bias is visible.
    #[default]
    Exclude,
    /// Include timed-out trials at the horizon value, as right-censored lower
    /// bounds on their absorption time.
    CensorAtHorizon,
}

/// Means and base rate in effect on one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRates {
    /// Season the day belongs to
    pub season: Season,
    /// Mean daily leaf growth
    pub growth_mean: f64,
    /// Mean daily leaf fall
    pub fall_mean: f64,
    /// Seasonal base ignition probability
    pub base_ignition: f64,
}

/// Full static configuration of a Monte Carlo batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Days between rakings (0 disables raking)
    pub raking_frequency: u32,
    /// First day raking may happen
    pub raking_warmup: u32,
    /// Leaf volume removed from every cell on a raking day
    pub raking_amount: f64,
    /// Nutrient volume lost by every cell each day
    pub nutrient_depletion_rate: f64,
    /// Per-season adjustments, indexed by [`Season::index`]
    pub seasons: [SeasonParams; 4],
    /// Average daily leaf fall before seasonal adjustment
    pub average_leaf_fall: f64,
    /// Average daily leaf growth before seasonal adjustment
    pub average_leaf_growth: f64,
    /// Mean fire duration in days
    pub average_fire_duration: f64,
    /// Days per season
    pub season_length: u32,
    /// Ignition probability added per burning corner neighbor
    pub p_fire_neighbor_corner: f64,
    /// Ignition probability added per burning edge neighbor
    pub p_fire_neighbor_edge: f64,
    /// Ignition probability per unit of standing leaf volume
    pub fuel_ignition_coefficient: f64,
    /// Last day simulated before a trial is declared timed out
    pub horizon: u32,
    /// Independent trials per batch
    pub num_trials: u32,
    /// Base seed; trial `k` draws from stream `k` of this seed
    pub seed: u64,
    /// Leaf volume every cell starts a trial with
    pub initial_leaf_volume: UnitVolume,
    /// Nutrient volume every cell starts a trial with
    pub initial_nutrient_volume: UnitVolume,
    /// Sign of leaf fall in the daily fuel delta
    pub fall_mode: FallMode,
    /// Treatment of trials that reach the horizon
    pub timeout_policy: TimeoutPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            raking_frequency: 7,
            raking_warmup: 0,
            raking_amount: 0.0001,
            nutrient_depletion_rate: 0.001,
            seasons: SeasonParams::reference_table(),
            average_leaf_fall: 0.015,
            average_leaf_growth: 0.008,
            average_fire_duration: 5.0,
            season_length: 91,
            p_fire_neighbor_corner: 0.050,
            p_fire_neighbor_edge: 0.075,
            fuel_ignition_coefficient: 0.25,
            horizon: 18250,
            num_trials: 1000,
            seed: 0,
            initial_leaf_volume: UnitVolume::ZERO,
            initial_nutrient_volume: UnitVolume::ZERO,
            fall_mode: FallMode::Add,
            timeout_policy: TimeoutPolicy::Exclude,
        }
    }
}

impl SimulationConfig {
    /// Configuration with no growth, no fall, no fire and no raking
    ///
    /// Starting point for deterministic scenarios: every stochastic term is
    /// zero until a caller turns it back on.
    pub fn quiescent(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            raking_frequency: 0,
            raking_amount: 0.0,
            nutrient_depletion_rate: 0.0,
            seasons: SeasonParams::quiet_table(),
            average_leaf_fall: 0.0,
            average_leaf_growth: 0.0,
            p_fire_neighbor_corner: 0.0,
            p_fire_neighbor_edge: 0.0,
            fuel_ignition_coefficient: 0.0,
            ..Self::default()
        }
    }

    /// Replace the grid extent
    pub fn with_extent(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Replace the trial count
    pub fn with_trials(mut self, num_trials: u32) -> Self {
        self.num_trials = num_trials;
        self
    }

    /// Replace the horizon
    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    /// Replace the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every parameter
    ///
    /// # Errors
    /// Returns the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.season_length == 0 {
            return Err(ConfigError::ZeroSeasonLength);
        }
        if self.num_trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }

        let non_negative = [
            ("raking_amount", self.raking_amount),
            ("nutrient_depletion_rate", self.nutrient_depletion_rate),
            ("average_leaf_fall", self.average_leaf_fall),
            ("average_leaf_growth", self.average_leaf_growth),
            ("average_fire_duration", self.average_fire_duration),
            ("p_fire_neighbor_corner", self.p_fire_neighbor_corner),
            ("p_fire_neighbor_edge", self.p_fire_neighbor_edge),
            ("fuel_ignition_coefficient", self.fuel_ignition_coefficient),
        ];
        for (field, value) in non_negative {
            check_non_negative(field, value)?;
        }

        for params in &self.seasons {
            check_non_negative("seasons.fire_base_rate", params.fire_base_rate)?;
            check_finite("seasons.leaf_fall_inc", params.leaf_fall_inc)?;
            check_finite("seasons.leaf_growth_inc", params.leaf_growth_inc)?;
        }

        check_poisson_mean("average_fire_duration", self.average_fire_duration, 1.0)?;
        for params in &self.seasons {
            let growth = self.average_leaf_growth + params.leaf_growth_inc;
            let fall = self.average_leaf_fall + params.leaf_fall_inc;
            check_poisson_mean("average_leaf_growth", growth, VOLUME_RESOLUTION)?;
            check_poisson_mean("average_leaf_fall", fall, VOLUME_RESOLUTION)?;
        }

        Ok(())
    }

    /// Whether day `day` is a raking day
    pub fn is_raking_day(&self, day: u32) -> bool {
        self.raking_frequency > 0
            && day >= self.raking_warmup
            && (day - self.raking_warmup) % self.raking_frequency == 0
    }

    /// Season in effect on `day`
    pub fn season(&self, day: u32) -> Season {
        Season::for_day(day, self.season_length)
    }

    /// Growth and fall means plus base ignition rate for `day`
    pub fn daily_rates(&self, day: u32) -> DailyRates {
        let season = self.season(day);
        let params = &self.seasons[season.index()];
        DailyRates {
            season,
            growth_mean: (self.average_leaf_growth + params.leaf_growth_inc).max(0.0),
            fall_mean: (self.average_leaf_fall + params.leaf_fall_inc).max(0.0),
            base_ignition: params.fire_base_rate,
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value, "finite"))
    }
}

/// `mean` drawn at `scale` must stay inside the Poisson sampler's range
fn check_poisson_mean(field: &'static str, mean: f64, scale: f64) -> Result<(), ConfigError> {
    if mean * scale <= MAX_POISSON_MEAN {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, mean, "small enough to sample"))
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value, "finite and non-negative"))
    }
}
