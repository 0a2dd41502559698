//! Absorbing-state detection
//!
//! A forest is absorbed once it is completely bare or completely saturated
//! with fuel. Totals are compared against a small tolerance because summing
//! many clamped floating-point volumes drifts.

use crate::grid::ForestGrid;
use serde::{Deserialize, Serialize};

/// Tolerance on the total leaf volume when deciding absorption
pub const ABSORPTION_EPSILON: f64 = 1e-3;

/// Classification of a grid by its total leaf volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridState {
    /// No fuel left anywhere
    Barren,
    /// Every cell at maximum fuel
    Saturated,
    /// Anything in between
    Active,
}

impl GridState {
    /// Classify `grid`
    pub fn classify(grid: &ForestGrid) -> Self {
        Self::from_total(grid.total_leaf_volume(), grid.len())
    }

    /// Classify a total leaf volume over `cell_count` cells
    pub fn from_total(total_leaf_volume: f64, cell_count: usize) -> Self {
        if total_leaf_volume < ABSORPTION_EPSILON {
            GridState::Barren
        } else if total_leaf_volume > cell_count as f64 - ABSORPTION_EPSILON {
            GridState::Saturated
        } else {
            GridState::Active
        }
    }

    /// Whether this is one of the two absorbing states
    pub fn is_absorbing(self) -> bool {
        !matches!(self, GridState::Active)
    }
}
