//! Headless front end for the forest fuel simulation
//!
//! Shared pieces of the `forest-sim` and `stratify` binaries: error type,
//! results-file reading and writing, configuration loading, plain-text grid
//! rendering and logging setup.

pub mod error;
pub mod render;
pub mod results_file;

pub use error::HeadlessError;

use forest_sim_core::SimulationConfig;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load a JSON configuration; missing fields take their defaults
///
/// # Errors
/// Returns [`HeadlessError::FileAccess`] if the file cannot be read and
/// [`HeadlessError::ConfigParse`] if it is not a valid configuration.
pub fn load_config(path: &Path) -> Result<SimulationConfig, HeadlessError> {
    let contents = fs::read_to_string(path).map_err(|source| HeadlessError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| HeadlessError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
