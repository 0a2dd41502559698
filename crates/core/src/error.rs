//! Error types for the simulation core

use std::fmt;

/// Rejected simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid must have at least one row and one column
    EmptyGrid {
        /// Configured row count
        rows: usize,
        /// Configured column count
        cols: usize,
    },
    /// Seasons must last at least one day
    ZeroSeasonLength,
    /// At least one trial is required
    ZeroTrials,
    /// A numeric parameter is negative, non-finite or out of its range
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// Value that was supplied
        value: f64,
        /// What the value must satisfy
        expected: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, value: f64, expected: &'static str) -> Self {
        ConfigError::InvalidValue {
            field,
            value,
            expected,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyGrid { rows, cols } => {
                write!(f, "Grid must be at least 1x1, got {rows}x{cols}")
            }
            ConfigError::ZeroSeasonLength => write!(f, "Season length must be at least one day"),
            ConfigError::ZeroTrials => write!(f, "Number of trials must be at least one"),
            ConfigError::InvalidValue {
                field,
                value,
                expected,
            } => write!(f, "Parameter {field} = {value}: must be {expected}"),
        }
    }
}

impl std::error::Error for ConfigError {}
