//! Immutable weighted grids.
//!
//! A `Grid` owns its rows outright. Sessions replace the whole grid on each
//! upload and share it read-only with background analysis through an `Arc`,
//! so nothing ever mutates a grid after construction.

use crate::cell::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D grid of integer weights. Zero marks an impassable cell.
///
/// Rows may have different lengths; bounds are checked per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Vec<i32>>,
}

impl Grid {
    /// Creates a grid that takes ownership of the given rows.
    pub fn new(rows: Vec<Vec<i32>>) -> Self {
        Self { cells: rows }
    }

    /// Creates a grid from borrowed rows, copying every row.
    pub fn from_rows(rows: &[Vec<i32>]) -> Self {
        Self {
            cells: rows.to_vec(),
        }
    }

    /// Returns the raw rows.
    pub fn rows(&self) -> &[Vec<i32>] {
        &self.cells
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|row| row.is_empty())
    }

    /// Looks up the weight at a cell's position. `None` when out of bounds.
    pub fn value_at(&self, cell: &Cell) -> Option<i32> {
        self.cells.get(cell.row)?.get(cell.col).copied()
    }

    /// Returns the cell at `(row, col)` carrying its grid weight.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<Cell> {
        let weight = *self.cells.get(row)?.get(col)?;
        Some(Cell::weighted(row, col, weight))
    }

    /// Returns the in-bounds cells directly below, right of, above and left
    /// of `cell`, in that order. Edges do not wrap around.
    pub fn neighbors(&self, cell: &Cell) -> Vec<Cell> {
        let (row, col) = cell.position();
        let candidates = [
            row.checked_add(1).map(|r| (r, col)),
            col.checked_add(1).map(|c| (row, c)),
            row.checked_sub(1).map(|r| (r, col)),
            col.checked_sub(1).map(|c| (row, c)),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter_map(|(r, c)| self.cell_at(r, c))
            .collect()
    }

    /// Returns the neighbors of `cell` whose weight is non-zero.
    pub fn reachable_neighbors(&self, cell: &Cell) -> Vec<Cell> {
        self.neighbors(cell)
            .into_iter()
            .filter(|n| n.weight != Some(0))
            .collect()
    }

    /// Iterates over every non-zero cell in row-major order.
    pub fn non_zero_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .filter(|(_, value)| **value != 0)
                .map(move |(col, value)| Cell::weighted(row, col, *value))
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "[{}]", values.join(", "))?;
        }
        Ok(())
    }
}
