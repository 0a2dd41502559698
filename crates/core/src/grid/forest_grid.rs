//! Forest grid and per-cell state
//!
//! Cells are stored row-major in a single `Vec`. Row-major order is also the
//! order in which the daily update consumes random draws.

use crate::core_types::UnitVolume;
use serde::{Deserialize, Serialize};
use std::panic::Location;
use tracing::warn;

/// State of one forest block
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForestCell {
    /// Standing fuel load (0-1)
    pub(crate) leaf_volume: UnitVolume,
    /// Soil nutrient level (0-1)
    pub(crate) nutrient_volume: UnitVolume,
    /// Burning today
    pub(crate) is_on_fire: bool,
    /// Ignition decided today, takes effect tomorrow
    pub(crate) will_be_on_fire: bool,
    /// Day on or after which the current fire goes out
    pub(crate) fire_end_time: u32,
}

impl ForestCell {
    /// Cell with the given starting volumes and no fire
    pub fn new(leaf_volume: UnitVolume, nutrient_volume: UnitVolume) -> Self {
        Self {
            leaf_volume,
            nutrient_volume,
            ..Self::default()
        }
    }

    /// Standing fuel load
    pub fn leaf_volume(&self) -> UnitVolume {
        self.leaf_volume
    }

    /// Soil nutrient level
    pub fn nutrient_volume(&self) -> UnitVolume {
        self.nutrient_volume
    }

    /// Burning today
    pub fn is_on_fire(&self) -> bool {
        self.is_on_fire
    }

    /// Scheduled to ignite tomorrow
    pub fn will_be_on_fire(&self) -> bool {
        self.will_be_on_fire
    }

    /// Day the current fire ends; only meaningful while burning
    pub fn fire_end_time(&self) -> u32 {
        self.fire_end_time
    }

    /// Overwrite the fuel load (clamped)
    pub fn set_leaf_volume(&mut self, volume: f64) {
        self.leaf_volume = UnitVolume::new(volume);
    }

    /// Overwrite the nutrient level (clamped)
    pub fn set_nutrient_volume(&mut self, volume: f64) {
        self.nutrient_volume = UnitVolume::new(volume);
    }

    /// Force the cell to burn until `end_day`
    pub fn ignite_until(&mut self, end_day: u32) {
        self.is_on_fire = true;
        self.will_be_on_fire = false;
        self.fire_end_time = end_day;
    }

    /// Schedule the cell to catch fire tomorrow and burn until `end_day`
    pub fn schedule_ignition(&mut self, end_day: u32) {
        self.will_be_on_fire = true;
        self.fire_end_time = end_day;
    }

    /// Read-only view of this cell
    pub fn view(&self) -> CellView {
        CellView {
            leaf_volume: *self.leaf_volume,
            nutrient_volume: *self.nutrient_volume,
            is_on_fire: self.is_on_fire,
            will_be_on_fire: self.will_be_on_fire,
            fire_end_time: self.is_on_fire.then_some(self.fire_end_time),
        }
    }
}

/// Read-only snapshot of a cell for reporting and visualization
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellView {
    /// Standing fuel load (0-1)
    pub leaf_volume: f64,
    /// Soil nutrient level (0-1)
    pub nutrient_volume: f64,
    /// Burning today
    pub is_on_fire: bool,
    /// Ignites tomorrow
    pub will_be_on_fire: bool,
    /// End of the current fire, `None` when not burning
    pub fire_end_time: Option<u32>,
}

/// Fixed-size grid of forest cells for a single trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestGrid {
    rows: usize,
    cols: usize,
    cells: Vec<ForestCell>,
}

impl ForestGrid {
    /// Grid of `rows x cols` empty cells
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, ForestCell::default())
    }

    /// Grid where every cell starts as `cell`
    pub fn filled(rows: usize, cols: usize, cell: ForestCell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `(row, col)` is inside the grid
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Flat row-major index of `(row, col)`
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Snapshot of the cell at `(row, col)`
    ///
    /// Out-of-range coordinates are reported together with the calling
    /// location and yield `None`; callers treat the missing cell as a no-op.
    #[track_caller]
    pub fn cell(&self, row: usize, col: usize) -> Option<CellView> {
        if self.contains(row, col) {
            Some(self.cells[self.index(row, col)].view())
        } else {
            self.report_out_of_bounds(row, col, Location::caller());
            None
        }
    }

    /// Mutable access to the cell at `(row, col)`, `None` when out of range
    #[track_caller]
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut ForestCell> {
        if self.contains(row, col) {
            let index = self.index(row, col);
            Some(&mut self.cells[index])
        } else {
            self.report_out_of_bounds(row, col, Location::caller());
            None
        }
    }

    fn report_out_of_bounds(&self, row: usize, col: usize, caller: &Location<'_>) {
        warn!(
            "Out of bounds cell r: {} c: {} (grid {}x{}) from {}",
            row, col, self.rows, self.cols, caller
        );
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[ForestCell] {
        &self.cells
    }

    /// All cells, row-major, mutable
    pub fn cells_mut(&mut self) -> &mut [ForestCell] {
        &mut self.cells
    }

    /// Snapshot rows, top to bottom
    pub fn view_rows(&self) -> impl Iterator<Item = Vec<CellView>> + '_ {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(ForestCell::view).collect())
    }

    /// Sum of leaf volume over all cells
    pub fn total_leaf_volume(&self) -> f64 {
        self.cells.iter().map(|c| *c.leaf_volume).sum()
    }

    /// Number of cells burning today
    pub fn burning_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_on_fire).count()
    }
}
