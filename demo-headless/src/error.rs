//! Errors reported by the headless binaries

use forest_sim_core::ConfigError;
use std::fmt;
use std::path::PathBuf;

/// Failure of a headless run
#[derive(Debug)]
pub enum HeadlessError {
    /// A file could not be opened, read or written
    FileAccess {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// A configuration file is not valid JSON for `SimulationConfig`
    ConfigParse {
        /// Offending path
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },
    /// The configuration was rejected
    Config(ConfigError),
}

impl fmt::Display for HeadlessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadlessError::FileAccess { path, source } => {
                write!(f, "Can't access file {}: {source}", path.display())
            }
            HeadlessError::ConfigParse { path, source } => {
                write!(f, "Invalid configuration in {}: {source}", path.display())
            }
            HeadlessError::Config(err) => write!(f, "Invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for HeadlessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HeadlessError::FileAccess { source, .. } => Some(source),
            HeadlessError::ConfigParse { source, .. } => Some(source),
            HeadlessError::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for HeadlessError {
    fn from(err: ConfigError) -> Self {
        HeadlessError::Config(err)
    }
}
