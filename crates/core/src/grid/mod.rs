//! Grid-based simulation modules

pub mod forest_grid;
pub mod neighbors;

// Re-export main types
pub use forest_grid::*;
pub use neighbors::*;
