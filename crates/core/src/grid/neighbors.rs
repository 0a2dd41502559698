//! Precomputed neighbor topology
//!
//! For every cell the diagonal (corner) and orthogonal (edge) neighbors are
//! stored as flat cell indices in one shared arena. Each cell owns two ranges
//! into that arena. Neighbors are clipped at the grid boundary; there is no
//! wraparound, so border cells have fewer neighbors than interior ones.
//!
//! The topology depends only on the grid shape. It is built once and shared
//! read-only by every trial on that shape.

use std::ops::Range;

/// Corner offsets, in the order they are stored
const CORNER_OFFSETS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Edge offsets, in the order they are stored
const EDGE_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Boundary-clipped corner and edge adjacency for a `rows x cols` grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTopology {
    rows: usize,
    cols: usize,
    /// All neighbor indices, cell by cell: corners then edges
    arena: Vec<u32>,
    /// Per cell: `[corner_start, edge_start, end)` into `arena`
    spans: Vec<(u32, u32, u32)>,
}

impl NeighborTopology {
    /// Build the topology for a grid of `rows x cols` cells
    #[must_use]
    pub fn build(rows: usize, cols: usize) -> Self {
        let cell_count = rows * cols;
        let mut arena = Vec::with_capacity(cell_count * 8);
        let mut spans = Vec::with_capacity(cell_count);

        for row in 0..rows {
            for col in 0..cols {
                let corner_start = arena.len() as u32;
                push_in_bounds(&mut arena, rows, cols, row, col, &CORNER_OFFSETS);
                let edge_start = arena.len() as u32;
                push_in_bounds(&mut arena, rows, cols, row, col, &EDGE_OFFSETS);
                spans.push((corner_start, edge_start, arena.len() as u32));
            }
        }

        Self {
            rows,
            cols,
            arena,
            spans,
        }
    }

    /// Grid shape this topology was built for
    pub fn extent(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether this topology matches a `rows x cols` grid
    pub fn matches(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows && self.cols == cols
    }

    /// Number of cells covered
    pub fn cell_count(&self) -> usize {
        self.spans.len()
    }

    /// Diagonal neighbors of the cell at flat index `index`
    #[inline]
    pub fn corners(&self, index: usize) -> &[u32] {
        let (start, mid, _) = self.spans[index];
        &self.arena[to_range(start, mid)]
    }

    /// Orthogonal neighbors of the cell at flat index `index`
    #[inline]
    pub fn edges(&self, index: usize) -> &[u32] {
        let (_, mid, end) = self.spans[index];
        &self.arena[to_range(mid, end)]
    }

    /// Flat index of `(row, col)`
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

#[inline]
fn to_range(start: u32, end: u32) -> Range<usize> {
    start as usize..end as usize
}

fn push_in_bounds(
    arena: &mut Vec<u32>,
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
    offsets: &[(isize, isize)],
) {
    for &(dr, dc) in offsets {
        let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
            continue;
        };
        if r < rows && c < cols {
            arena.push((r * cols + c) as u32);
        }
    }
}
