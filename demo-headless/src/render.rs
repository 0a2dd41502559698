//! Plain-text rendering of a grid snapshot
//!
//! Consumes only the read-only `CellView` snapshot exposed by the core.

use forest_sim_core::{CellView, ForestGrid};
use std::fmt::Write as _;

fn render_matrix(grid: &ForestGrid, cell_text: impl Fn(&CellView) -> String) -> String {
    let mut out = String::new();
    for row in grid.view_rows() {
        let line: Vec<String> = row.iter().map(&cell_text).collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    out
}

/// Leaf volumes, three decimals, one grid row per line
pub fn leaf_matrix(grid: &ForestGrid) -> String {
    render_matrix(grid, |cell| format!("{:.3}", cell.leaf_volume))
}

/// Nutrient volumes, three decimals, one grid row per line
pub fn nutrient_matrix(grid: &ForestGrid) -> String {
    render_matrix(grid, |cell| format!("{:.3}", cell.nutrient_volume))
}

/// `1` for burning cells, `0` otherwise
pub fn fire_matrix(grid: &ForestGrid) -> String {
    render_matrix(grid, |cell| u8::from(cell.is_on_fire).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrices() {
        let mut grid = ForestGrid::new(2, 2);
        grid.cell_mut(0, 1).unwrap().set_leaf_volume(0.25);
        grid.cell_mut(1, 0).unwrap().ignite_until(3);
        grid.cell_mut(1, 1).unwrap().set_nutrient_volume(1.0);

        assert_eq!(leaf_matrix(&grid), "0.000 0.250\n0.000 0.000\n");
        assert_eq!(fire_matrix(&grid), "0 0\n1 0\n");
        assert_eq!(nutrient_matrix(&grid), "0.000 0.000\n0.000 1.000\n");
    }
}
