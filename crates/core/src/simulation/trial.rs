//! Single-trial driver
//!
//! A trial starts from a fresh grid and steps day by day until the grid reaches
//! an absorbing state or the configured horizon passes. The neighbor topology
//! is owned by the runner and reused across trials.

use super::absorption::GridState;
use super::daily::DailyUpdate;
use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::grid::{ForestCell, ForestGrid, NeighborTopology};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How a trial ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrialOutcome {
    /// All fuel gone
    Barren,
    /// All cells at maximum fuel
    Saturated,
    /// Horizon reached without absorption
    TimedOut,
}

impl fmt::Display for TrialOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrialOutcome::Barren => "barren",
            TrialOutcome::Saturated => "saturated",
            TrialOutcome::TimedOut => "timed out",
        };
        f.write_str(name)
    }
}

/// Day and kind of a trial's end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrialResult {
    /// Day absorption was detected, or the horizon for timed-out trials
    pub day: u32,
    /// How the trial ended
    pub outcome: TrialOutcome,
}

impl TrialResult {
    /// Whether the trial reached an absorbing state
    pub fn is_absorbed(&self) -> bool {
        self.outcome != TrialOutcome::TimedOut
    }
}

/// Mutable state of one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub(crate) grid: ForestGrid,
    pub(crate) day: u32,
}

impl SimulationState {
    /// Fresh state at day 0 with every cell at the configured initial volumes
    pub fn new(config: &SimulationConfig) -> Self {
        let cell = ForestCell::new(config.initial_leaf_volume, config.initial_nutrient_volume);
        Self::from_grid(ForestGrid::filled(config.rows, config.cols, cell))
    }

    /// State at day 0 with a caller-prepared grid
    pub fn from_grid(grid: ForestGrid) -> Self {
        Self { grid, day: 0 }
    }

    /// Current grid
    pub fn grid(&self) -> &ForestGrid {
        &self.grid
    }

    /// Current grid, mutable
    pub fn grid_mut(&mut self) -> &mut ForestGrid {
        &mut self.grid
    }

    /// Next day to simulate
    pub fn day(&self) -> u32 {
        self.day
    }
}

/// Runs trials for one configuration
#[derive(Debug, Clone)]
pub struct TrialRunner {
    config: SimulationConfig,
    topology: NeighborTopology,
}

impl TrialRunner {
    /// Validate `config` and build its topology
    ///
    /// # Errors
    /// Returns the configuration error if `config` is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let topology = NeighborTopology::build(config.rows, config.cols);
        Ok(Self { config, topology })
    }

    /// Swap in a new configuration
    ///
    /// The topology is rebuilt only when the grid shape changes.
    ///
    /// # Errors
    /// Returns the configuration error and leaves the runner unchanged if
    /// `config` is invalid.
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if !self.topology.matches(config.rows, config.cols) {
            debug!(
                "Rebuilding neighbor topology for {}x{} grid",
                config.rows, config.cols
            );
            self.topology = NeighborTopology::build(config.rows, config.cols);
        }
        self.config = config;
        Ok(())
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Shared topology
    pub fn topology(&self) -> &NeighborTopology {
        &self.topology
    }

    /// Independent random stream for trial `trial`
    ///
    /// Every trial of a batch shares the configured seed and draws from its
    /// own stream, so results do not depend on which thread runs the trial.
    pub fn rng_for_trial(&self, trial: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        rng.set_stream(trial);
        rng
    }

    /// Run trial number `trial` of the batch
    pub fn run_trial(&self, trial: u64) -> TrialResult {
        self.run_trial_with_state(trial).0
    }

    /// Run trial number `trial` and keep its final state
    pub fn run_trial_with_state(&self, trial: u64) -> (TrialResult, SimulationState) {
        let mut rng = self.rng_for_trial(trial);
        let mut state = SimulationState::new(&self.config);
        let result = self.run_from(&mut state, &mut rng);
        debug!(
            "Trial {} ended {} on day {}",
            trial, result.outcome, result.day
        );
        (result, state)
    }

    /// Step `state` until absorption or the horizon
    ///
    /// Absorption is checked after every simulated day; the first absorbing
    /// day is recorded. A trial that is still active after the last day before
    /// the horizon is recorded as timed out on the horizon day.
    pub fn run_from<R: Rng + ?Sized>(&self, state: &mut SimulationState, rng: &mut R) -> TrialResult {
        let engine = DailyUpdate::new(&self.config, &self.topology);
        while state.day < self.config.horizon {
            let day = state.day;
            engine.advance(&mut state.grid, day, rng);
            state.day += 1;
            match GridState::classify(&state.grid) {
                GridState::Barren => return absorbed(day, TrialOutcome::Barren),
                GridState::Saturated => return absorbed(day, TrialOutcome::Saturated),
                GridState::Active => {}
            }
        }
        TrialResult {
            day: self.config.horizon,
            outcome: TrialOutcome::TimedOut,
        }
    }
}

fn absorbed(day: u32, outcome: TrialOutcome) -> TrialResult {
    TrialResult { day, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{SeasonParams, UnitVolume};

    #[test]
    fn test_immediate_barren() {
        let runner = TrialRunner::new(SimulationConfig::quiescent(1, 1)).unwrap();
        let result = runner.run_trial(0);
        assert_eq!(
            result,
            TrialResult {
                day: 0,
                outcome: TrialOutcome::Barren
            }
        );
    }

    #[test]
    fn test_saturates_under_pure_growth() {
        let config = SimulationConfig {
            average_leaf_growth: 0.1,
            ..SimulationConfig::quiescent(3, 3)
        };
        let runner = TrialRunner::new(config).unwrap();
        let result = runner.run_trial(0);
        assert_eq!(result.outcome, TrialOutcome::Saturated);
        assert!(result.day > 0 && result.day < 100);
    }

    #[test]
    fn test_times_out_at_horizon() {
        let config = SimulationConfig {
            initial_leaf_volume: UnitVolume::new(0.5),
            horizon: 40,
            ..SimulationConfig::quiescent(2, 2)
        };
        let runner = TrialRunner::new(config).unwrap();
        let (result, state) = runner.run_trial_with_state(3);
        assert_eq!(
            result,
            TrialResult {
                day: 40,
                outcome: TrialOutcome::TimedOut
            }
        );
        assert!(!result.is_absorbed());
        assert_eq!(state.day(), 40);
        assert!((state.grid().total_leaf_volume() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_trial_is_reproducible() {
        let config = SimulationConfig::default()
            .with_extent(4, 4)
            .with_horizon(2000)
            .with_seed(99);
        let runner = TrialRunner::new(config).unwrap();
        assert_eq!(runner.run_trial_with_state(5), runner.run_trial_with_state(5));
    }

    #[test]
    fn test_streams_differ_between_trials() {
        let runner = TrialRunner::new(SimulationConfig::default().with_seed(1)).unwrap();
        let mut a = runner.rng_for_trial(0);
        let mut b = runner.rng_for_trial(1);
        let xs: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_reconfigure_keeps_topology_for_same_shape() {
        let mut runner = TrialRunner::new(SimulationConfig::default().with_extent(3, 5)).unwrap();
        let before = runner.topology().clone();
        runner
            .reconfigure(SimulationConfig::default().with_extent(3, 5).with_seed(8))
            .unwrap();
        assert_eq!(runner.topology(), &before);
        assert_eq!(runner.config().seed, 8);

        runner
            .reconfigure(SimulationConfig::default().with_extent(6, 2))
            .unwrap();
        assert_eq!(runner.topology().extent(), (6, 2));

        let err = runner.reconfigure(SimulationConfig::default().with_extent(0, 2));
        assert!(err.is_err());
        assert_eq!(runner.topology().extent(), (6, 2));
    }

    #[test]
    fn test_declining_fuel_ends_barren() {
        // Leaves only decline and fires clear what is left
        let config = SimulationConfig {
            seasons: [SeasonParams::new(0.0, 0.0, 0.05); 4],
            average_leaf_fall: 0.02,
            fall_mode: crate::config::FallMode::Subtract,
            initial_leaf_volume: UnitVolume::new(0.6),
            horizon: 5000,
            ..SimulationConfig::quiescent(3, 3)
        };
        let runner = TrialRunner::new(config).unwrap();
        let result = runner.run_trial(0);
        assert_eq!(result.outcome, TrialOutcome::Barren);
    }
}
