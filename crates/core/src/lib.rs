//! Forest Fuel Simulation Core Library
//!
//! Estimates, by repeated stochastic simulation, the expected time for a
//! forest grid under periodic raking to reach an absorbing state: every cell
//! bare of fuel, or every cell saturated with it.
//!
//! ## Overview
//!
//! - [`grid`]: per-cell fuel, nutrient and fire state plus the boundary-clipped
//!   neighbor topology
//! - [`simulation`]: the four-phase daily update, absorption detection, the
//!   trial runner and the parallel Monte Carlo harness
//! - [`stats`]: naive and stratified estimators of the mean absorption day
//!
//! ```
//! use forest_sim_core::{MonteCarlo, SimulationConfig};
//!
//! let config = SimulationConfig::default()
//!     .with_extent(2, 2)
//!     .with_trials(8)
//!     .with_horizon(500);
//! let report = MonteCarlo::new(config).unwrap().run();
//! assert_eq!(report.results.len(), 8);
//! ```

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod stats;

// Re-export main types
pub use config::{FallMode, SimulationConfig, TimeoutPolicy};
pub use core_types::{Season, SeasonParams, UnitVolume};
pub use error::ConfigError;
pub use grid::{CellView, ForestCell, ForestGrid, NeighborTopology};
pub use simulation::{
    BatchReport, DailyUpdate, GridState, MonteCarlo, SimulationState, TrialOutcome, TrialResult,
    TrialRunner,
};
pub use stats::{CutPoints, Estimate, StratifiedEstimate};
