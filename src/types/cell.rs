use serde::{Deserialize, Serialize};

use crate::config::MAX_SPLIT_CELLS;

/// Grid coordinate (0-indexed).
///
/// Used as the back-reference from a covered cell to its merge anchor.
/// It is a lookup key into the grid, never an owning edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Extent of a merge region owned by its anchor cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSpan {
    pub row_span: u32,
    pub col_span: u32,
}

/// Nested row-major grid owned by a split cell
#[derive(Debug, Clone, PartialEq)]
pub struct SplitGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    pub column_fractions: Option<Vec<f64>>,
    pub row_fractions: Option<Vec<f64>>,
}

/// Stand-in for split positions the persisted document left out.
static EMPTY_CELL: Cell = Cell {
    id: String::new(),
    content: String::new(),
    style: None,
    kind: CellKind::Plain,
};

impl SplitGrid {
    /// Build a split grid from the persisted children.
    ///
    /// Extra children beyond `rows * cols` are dropped. Missing ones are not
    /// materialized: [`SplitGrid::child`] reports them as empty plain cells.
    ///
    /// Returns `None` when either dimension is zero or the split declares
    /// more than [`MAX_SPLIT_CELLS`] positions.
    pub fn new(rows: usize, cols: usize, mut cells: Vec<Cell>) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        let expected = match rows.checked_mul(cols) {
            Some(n) if n <= MAX_SPLIT_CELLS => n,
            _ => {
                log::warn!("split {rows}x{cols} exceeds {MAX_SPLIT_CELLS} cells, ignoring it");
                return None;
            }
        };
        if cells.len() != expected {
            log::warn!(
                "split {rows}x{cols} carries {} children, expected {expected}",
                cells.len()
            );
            cells.truncate(expected);
        }
        Some(Self {
            rows,
            cols,
            cells,
            column_fractions: None,
            row_fractions: None,
        })
    }

    #[must_use]
    pub fn with_fractions(
        mut self,
        column_fractions: Option<Vec<f64>>,
        row_fractions: Option<Vec<f64>>,
    ) -> Self {
        self.column_fractions = column_fractions;
        self.row_fractions = row_fractions;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Persisted children in row-major order; may be shorter than `rows * cols`.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every position in row-major order, missing ones as empty cells.
    pub fn children(&self) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.rows * self.cols).filter_map(move |i| self.child(i))
    }

    /// Child at row-major index; an empty cell when in range but not persisted.
    pub fn child(&self, index: usize) -> Option<&Cell> {
        if index >= self.rows * self.cols {
            return None;
        }
        Some(self.cells.get(index).unwrap_or(&EMPTY_CELL))
    }

    /// Child at `(row, col)` inside this split.
    pub fn child_at(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.child(row * self.cols + col)
    }

    /// Children of one split column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.rows).filter_map(move |r| self.child_at(r, col))
    }

    /// Children of one split row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.cols).filter_map(move |c| self.child_at(row, c))
    }
}

/// Structural role of a cell.
///
/// Exactly one role applies, so a covered cell can never also own a split.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellKind {
    #[default]
    Plain,
    /// Anchor of a merge region; owns the merged area's content.
    Merged(MergeSpan),
    /// Position subsumed by the merge anchor at the given coordinate.
    Covered(CellCoord),
    /// Owns a nested grid of child cells.
    Split(SplitGrid),
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawCell", into = "RawCell")]
pub struct Cell {
    pub id: String,
    /// Source markup; only its extracted text matters here.
    pub content: String,
    /// Host style, passed through untouched.
    pub style: Option<serde_json::Value>,
    pub kind: CellKind,
}

impl Cell {
    /// Plain cell with the given content.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn merged(content: impl Into<String>, row_span: u32, col_span: u32) -> Self {
        Self {
            content: content.into(),
            kind: CellKind::Merged(MergeSpan { row_span, col_span }),
            ..Self::default()
        }
    }

    pub fn covered(row: usize, col: usize) -> Self {
        Self {
            kind: CellKind::Covered(CellCoord::new(row, col)),
            ..Self::default()
        }
    }

    /// Split cell; degrades to an empty plain cell if a dimension is zero or too large.
    pub fn split(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        Self {
            kind: SplitGrid::new(rows, cols, cells).map_or(CellKind::Plain, CellKind::Split),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_covered(&self) -> bool {
        matches!(self.kind, CellKind::Covered(_))
    }

    pub fn is_merge_anchor(&self) -> bool {
        matches!(self.kind, CellKind::Merged(_))
    }

    pub fn as_split(&self) -> Option<&SplitGrid> {
        match &self.kind {
            CellKind::Split(split) => Some(split),
            _ => None,
        }
    }

    pub fn covered_by(&self) -> Option<CellCoord> {
        match self.kind {
            CellKind::Covered(coord) => Some(coord),
            _ => None,
        }
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            id: String::new(),
            cells,
        }
    }
}

/// Immutable table snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Sizing hint; only its length matters here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_fractions: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_fractions: Option<Vec<f64>>,
    #[serde(default)]
    pub header_row: bool,
    /// Hint only; see [`crate::header_depth`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_row_count: Option<usize>,
}

// ============================================================================
// Persisted cell shape
// ============================================================================

/// Cell as persisted by the host: role flags are independent optionals,
/// so contradictory combinations are possible and get repaired on ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCell {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "html")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged: Option<MergeSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covered: Option<CellCoord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<RawSplit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSplit {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub cells: Vec<RawCell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_fractions: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_fractions: Option<Vec<f64>>,
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        let kind = match (raw.covered, raw.merged, raw.split) {
            (Some(anchor), merged, split) => {
                if merged.is_some() || split.is_some() {
                    log::warn!(
                        "cell {:?} is covered and also carries merge/split data; keeping covered",
                        raw.id
                    );
                }
                CellKind::Covered(anchor)
            }
            (None, Some(span), split) => {
                if split.is_some() {
                    log::warn!("cell {:?} is a merge anchor and split; dropping split", raw.id);
                }
                CellKind::Merged(span)
            }
            (None, None, Some(split)) => {
                let RawSplit {
                    rows,
                    cols,
                    cells,
                    column_fractions,
                    row_fractions,
                } = split;
                let children = cells.into_iter().map(Cell::from).collect();
                match SplitGrid::new(rows, cols, children) {
                    Some(grid) => {
                        CellKind::Split(grid.with_fractions(column_fractions, row_fractions))
                    }
                    None => {
                        log::warn!("cell {:?} has an unusable {rows}x{cols} split", raw.id);
                        CellKind::Plain
                    }
                }
            }
            (None, None, None) => CellKind::Plain,
        };

        Self {
            id: raw.id,
            content: raw.content,
            style: raw.style,
            kind,
        }
    }
}

impl From<Cell> for RawCell {
    fn from(cell: Cell) -> Self {
        let mut raw = RawCell {
            id: cell.id,
            content: cell.content,
            style: cell.style,
            ..RawCell::default()
        };
        match cell.kind {
            CellKind::Plain => {}
            CellKind::Merged(span) => raw.merged = Some(span),
            CellKind::Covered(anchor) => raw.covered = Some(anchor),
            CellKind::Split(split) => {
                raw.split = Some(RawSplit {
                    rows: split.rows,
                    cols: split.cols,
                    cells: split.cells.into_iter().map(RawCell::from).collect(),
                    column_fractions: split.column_fractions,
                    row_fractions: split.row_fractions,
                });
            }
        }
        raw
    }
}
