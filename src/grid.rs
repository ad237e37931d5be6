//! Read-only queries over a [`Grid`] snapshot.
//!
//! Merge regions are stored as an anchor cell plus covered cells that point
//! back at it. Persisted documents can carry broken or cyclic back-references,
//! so every lookup here is bounded and returns `None` instead of failing.

use crate::config::COVERED_HOP_LIMIT;
use crate::types::{Cell, CellCoord, Grid, Row};

/// A cell together with the grid position it was found at
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCell<'a> {
    pub coord: CellCoord,
    pub cell: &'a Cell,
}

impl Grid {
    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// Cell stored at `(row, col)`, without resolving covered cells.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(col)
    }

    /// Follow covered back-references from `(row, col)` to the merge anchor.
    ///
    /// A cell that is not covered resolves to itself. Returns `None` when the
    /// position is empty, a reference points outside the grid, or more than
    /// six hops are needed (which also catches cycles).
    pub fn resolve_covered_cell(&self, row: usize, col: usize) -> Option<ResolvedCell<'_>> {
        self.resolve_covered_cell_with_limit(row, col, COVERED_HOP_LIMIT)
    }

    pub fn resolve_covered_cell_with_limit(
        &self,
        row: usize,
        col: usize,
        hop_limit: usize,
    ) -> Option<ResolvedCell<'_>> {
        let mut coord = CellCoord::new(row, col);
        for _ in 0..=hop_limit {
            let cell = self.cell(coord.row, coord.col)?;
            match cell.covered_by() {
                Some(anchor) => coord = anchor,
                None => return Some(ResolvedCell { coord, cell }),
            }
        }
        log::debug!("covered chain from ({row}, {col}) exceeded {hop_limit} hops");
        None
    }

    /// Number of top-level columns; never less than one.
    pub fn column_count(&self) -> usize {
        let widest_row = self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        let fractions = self.column_fractions.as_ref().map_or(0, Vec::len);
        widest_row.max(fractions).max(1)
    }

    /// True when column `col` has at least one cell and every cell present
    /// there is covered, i.e. no anchor ever occupies the slot.
    pub fn is_column_always_covered(&self, col: usize) -> bool {
        let mut present = self.rows.iter().filter_map(|r| r.cells.get(col)).peekable();
        present.peek().is_some() && present.all(Cell::is_covered)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<Cell>>) -> Grid {
        Grid {
            rows: rows.into_iter().map(Row::new).collect(),
            ..Grid::default()
        }
    }

    #[test]
    fn test_resolve_plain_cell_is_itself() {
        let g = grid(vec![vec![Cell::text("a")]]);
        let resolved = g.resolve_covered_cell(0, 0).unwrap();
        assert_eq!(resolved.coord, CellCoord::new(0, 0));
        assert_eq!(resolved.cell.content, "a");
    }

    #[test]
    fn test_resolve_follows_chain() {
        let g = grid(vec![vec![
            Cell::merged("anchor", 1, 3),
            Cell::covered(0, 0),
            Cell::covered(0, 1),
        ]]);
        let resolved = g.resolve_covered_cell(0, 2).unwrap();
        assert_eq!(resolved.coord, CellCoord::new(0, 0));
        assert_eq!(resolved.cell.content, "anchor");
    }

    #[test]
    fn test_resolve_cycle_terminates() {
        let g = grid(vec![vec![Cell::covered(0, 1), Cell::covered(0, 0)]]);
        assert!(g.resolve_covered_cell(0, 0).is_none());
    }

    #[test]
    fn test_resolve_self_reference_terminates() {
        let g = grid(vec![vec![Cell::covered(0, 0)]]);
        assert!(g.resolve_covered_cell(0, 0).is_none());
    }

    #[test]
    fn test_resolve_broken_reference() {
        let g = grid(vec![vec![Cell::covered(9, 9)]]);
        assert!(g.resolve_covered_cell(0, 0).is_none());
        assert!(g.resolve_covered_cell(5, 0).is_none());
    }

    #[test]
    fn test_hop_guard_allows_six_hops() {
        let mut cells = vec![Cell::text("end")];
        for i in 0..6 {
            cells.push(Cell::covered(0, i));
        }
        let g = grid(vec![cells]);
        assert!(g.resolve_covered_cell(0, 6).is_some());

        let mut cells = vec![Cell::text("end")];
        for i in 0..7 {
            cells.push(Cell::covered(0, i));
        }
        let g = grid(vec![cells]);
        assert!(g.resolve_covered_cell(0, 7).is_none());
    }

    #[test]
    fn test_column_count() {
        assert_eq!(Grid::default().column_count(), 1);
        let mut g = grid(vec![vec![Cell::text("a")], vec![Cell::text("b"), Cell::text("c")]]);
        assert_eq!(g.column_count(), 2);
        g.column_fractions = Some(vec![0.25; 4]);
        assert_eq!(g.column_count(), 4);
    }

    #[test]
    fn test_always_covered_column() {
        let g = grid(vec![
            vec![Cell::merged("wide", 2, 2), Cell::covered(0, 0), Cell::text("x")],
            vec![Cell::covered(0, 0), Cell::covered(0, 0)],
        ]);
        assert!(!g.is_column_always_covered(0));
        assert!(g.is_column_always_covered(1));
        assert!(!g.is_column_always_covered(2));
        assert!(!g.is_column_always_covered(3));
    }
}
