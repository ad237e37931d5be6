//! Whole-document evaluation: catalog plus the style of every body cell.
//!
//! Walks the grid the way a renderer would. Covered cells are skipped,
//! split cells are visited leaf by leaf using row-major rendered index
//! paths, and each leaf is styled with its own leaf column path.

use serde::Serialize;

use crate::catalog::ColumnCatalogBuilder;
use crate::config::CatalogOptions;
use crate::engine::{CellRef, RuleEngine};
use crate::leaf_path::{cell_at_rendered_path, enumerate_rendered_leaves, leaf_col_path_in_cell};
use crate::types::{ColumnCatalogEntry, Document, StylePatch};

/// Style resolved for one rendered cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyleRecord {
    pub row: usize,
    pub col: usize,
    /// Rendered index path inside a split cell; empty for unsplit cells.
    pub index_path: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf_path: Option<Vec<usize>>,
    pub style: StylePatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub header_row_count: usize,
    pub catalog: Vec<ColumnCatalogEntry>,
    pub styles: Vec<CellStyleRecord>,
}

/// Evaluate a document with default options.
pub fn build_report(document: &Document) -> Report {
    build_report_with_options(document, CatalogOptions::default())
}

pub fn build_report_with_options(document: &Document, options: CatalogOptions) -> Report {
    let limit = options.limits.split_depth_limit;
    let catalog = ColumnCatalogBuilder::with_options(options).build(&document.grid);
    let header_rows = catalog.header_row_count;
    let engine = RuleEngine::new();
    let mut styles = Vec::new();

    for (row_index, row) in document.grid.rows.iter().enumerate().skip(header_rows) {
        for (col, cell) in row.cells.iter().enumerate() {
            if cell.is_covered() {
                continue;
            }
            for index_path in enumerate_rendered_leaves(cell) {
                let Some(leaf) = cell_at_rendered_path(cell, &index_path) else {
                    continue;
                };
                let leaf_path = leaf_col_path_in_cell(cell, &index_path, limit);
                let cell_ref = CellRef {
                    row_index,
                    top_col_index: col,
                    leaf_path: leaf_path.as_deref(),
                    cell: leaf,
                };
                if let Some(style) = engine.get_then(&cell_ref, &document.rule_sets, header_rows) {
                    styles.push(CellStyleRecord {
                        row: row_index,
                        col,
                        index_path,
                        leaf_path,
                        style,
                    });
                }
            }
        }
    }

    log::debug!(
        "evaluated {} rows, {} styled cells",
        document.grid.rows.len().saturating_sub(header_rows),
        styles.len()
    );

    Report {
        header_row_count: header_rows,
        catalog: catalog.entries,
        styles,
    }
}
