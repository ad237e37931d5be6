//! Test fixtures for building grid snapshots in memory.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{GridBuilder, split};
//!
//! let grid = GridBuilder::new()
//!     .header_rows(1)
//!     .row(["Name", "Score"])
//!     .cells(vec![text("ann"), split(2, 1, ["10", "20"])])
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridfmt::{Cell, Grid, Row};

// ============================================================================
// Cell helpers
// ============================================================================

pub fn text(content: &str) -> Cell {
    Cell::text(content)
}

pub fn merged(content: &str, row_span: u32, col_span: u32) -> Cell {
    Cell::merged(content, row_span, col_span)
}

pub fn covered(row: usize, col: usize) -> Cell {
    Cell::covered(row, col)
}

/// Split cell whose children are plain text cells, row-major.
pub fn split<const N: usize>(rows: usize, cols: usize, children: [&str; N]) -> Cell {
    Cell::split(rows, cols, children.iter().map(|c| Cell::text(*c)).collect())
}

/// Split cell with arbitrary children.
pub fn split_of(rows: usize, cols: usize, children: Vec<Cell>) -> Cell {
    Cell::split(rows, cols, children)
}

// ============================================================================
// Grid Builder
// ============================================================================

/// Builder for grid snapshots.
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    rows: Vec<Row>,
    header_row: bool,
    header_row_count: Option<usize>,
    column_fractions: Option<Vec<f64>>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the grid as having a header with the given hint.
    pub fn header_rows(mut self, count: usize) -> Self {
        self.header_row = true;
        self.header_row_count = Some(count);
        self
    }

    /// Header flag set without a count hint.
    pub fn header_flag(mut self) -> Self {
        self.header_row = true;
        self.header_row_count = None;
        self
    }

    pub fn column_fractions(mut self, fractions: Vec<f64>) -> Self {
        self.column_fractions = Some(fractions);
        self
    }

    /// Row of plain text cells.
    pub fn row<const N: usize>(self, labels: [&str; N]) -> Self {
        self.cells(labels.iter().map(|l| Cell::text(*l)).collect())
    }

    pub fn cells(mut self, cells: Vec<Cell>) -> Self {
        self.rows.push(Row::new(cells));
        self
    }

    pub fn build(self) -> Grid {
        Grid {
            rows: self.rows,
            column_fractions: self.column_fractions,
            row_fractions: None,
            header_row: self.header_row,
            header_row_count: self.header_row_count,
        }
    }
}
