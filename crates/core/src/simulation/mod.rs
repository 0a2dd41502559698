//! Forest fuel simulation
//!
//! `DailyUpdate` advances one grid by one day, `GridState` detects absorption,
//! `TrialRunner` drives a single trial to absorption or the horizon and
//! `MonteCarlo` repeats trials and collects the results.

pub mod absorption;
pub mod daily;
pub mod monte_carlo;
pub mod trial;

// Re-export public types
pub use absorption::{GridState, ABSORPTION_EPSILON};
pub use daily::DailyUpdate;
pub use monte_carlo::{BatchReport, MonteCarlo};
pub use trial::{SimulationState, TrialOutcome, TrialResult, TrialRunner};
