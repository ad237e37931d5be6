//! Column catalog: every addressable column of a grid with a display name.
//!
//! A top-level column always yields a whole-column entry. When its header
//! cells are split into several columns, each leaf column gets its own entry
//! named after the header texts along its leaf path.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::CatalogOptions;
use crate::header_depth::{leaf_texts, DefaultHeaderHeuristic, HeaderDepthHeuristic};
use crate::leaf_path::{collect_leaf_col_paths_bounded, LeafPath};
use crate::types::{CatalogKind, Cell, ColumnCatalogEntry, Grid};
use crate::value::TextCache;

/// Catalog entries plus the header depth they were derived with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCatalog {
    pub header_row_count: usize,
    pub entries: Vec<ColumnCatalogEntry>,
}

/// Builds a [`ColumnCatalog`] from a grid snapshot.
///
/// Pure: the same grid always yields the same catalog.
#[derive(Debug, Clone, Default)]
pub struct ColumnCatalogBuilder<H = DefaultHeaderHeuristic> {
    options: CatalogOptions,
    heuristic: H,
}

impl ColumnCatalogBuilder<DefaultHeaderHeuristic> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CatalogOptions) -> Self {
        let heuristic = DefaultHeaderHeuristic::new(options.limits, options.thresholds);
        Self { options, heuristic }
    }
}

impl<H: HeaderDepthHeuristic> ColumnCatalogBuilder<H> {
    /// Use a custom header-depth heuristic.
    pub fn with_heuristic(options: CatalogOptions, heuristic: H) -> Self {
        Self { options, heuristic }
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    pub fn header_row_count(&self, grid: &Grid) -> usize {
        self.heuristic.header_row_count(grid, &TextCache::new())
    }

    pub fn build(&self, grid: &Grid) -> ColumnCatalog {
        let text = TextCache::new();
        let header_rows = self.heuristic.header_row_count(grid, &text);
        let mut entries = Vec::new();
        let mut seen: HashSet<(usize, LeafPath)> = HashSet::new();

        for col in 0..grid.column_count() {
            if grid.is_column_always_covered(col) {
                continue;
            }
            let fallback = format!("Column {}", col + 1);
            let leaf_paths = self.leaf_paths_for_column(grid, col, header_rows);

            let mut whole_name = self
                .column_name(grid, col, header_rows, &text, None)
                .unwrap_or_else(|| fallback.clone());
            if !leaf_paths.is_empty() {
                whole_name.push_str(&self.options.whole_suffix);
            }
            entries.push(ColumnCatalogEntry {
                kind: CatalogKind::Whole,
                top_col_index: col,
                leaf_path: None,
                name: whole_name,
            });

            for path in leaf_paths {
                if !seen.insert((col, path.clone())) {
                    continue;
                }
                let name = self
                    .column_name(grid, col, header_rows, &text, Some(&path))
                    .unwrap_or_else(|| fallback.clone());
                entries.push(ColumnCatalogEntry {
                    kind: CatalogKind::Leaf,
                    top_col_index: col,
                    leaf_path: Some(path),
                    name,
                });
            }
        }

        ColumnCatalog {
            header_row_count: header_rows,
            entries,
        }
    }

    /// Leaf paths of the first header row that yields any.
    ///
    /// Shapes from different header rows are never combined.
    fn leaf_paths_for_column(&self, grid: &Grid, col: usize, header_rows: usize) -> Vec<LeafPath> {
        let limits = &self.options.limits;
        for row in 0..header_rows {
            let Some(resolved) = grid.resolve_covered_cell_with_limit(row, col, limits.covered_hop_limit)
            else {
                continue;
            };
            // A split anchored in another column describes that column's leaves.
            if resolved.coord.col != col {
                continue;
            }
            let paths = collect_leaf_col_paths_bounded(resolved.cell, 0, limits.split_depth_limit);
            if !paths.is_empty() {
                return paths;
            }
        }
        Vec::new()
    }

    /// Header text of a column: leaf column when `leaf_path` is set, whole otherwise.
    fn column_name(
        &self,
        grid: &Grid,
        col: usize,
        header_rows: usize,
        text: &TextCache,
        leaf_path: Option<&[usize]>,
    ) -> Option<String> {
        let mut layers = Vec::new();
        for row in 0..header_rows {
            let Some(resolved) =
                grid.resolve_covered_cell_with_limit(row, col, self.options.limits.covered_hop_limit)
            else {
                continue;
            };
            match leaf_path {
                Some(path) => self.leaf_layers(resolved.cell, path, 0, text, &mut layers),
                None => self.whole_layers(resolved.cell, 0, text, &mut layers),
            }
        }
        self.join_layers(layers)
    }

    fn leaf_layers(
        &self,
        cell: &Cell,
        path: &[usize],
        depth: usize,
        text: &TextCache,
        out: &mut Vec<String>,
    ) {
        let Some(split) = cell.as_split() else {
            push_text(cell, text, out);
            return;
        };
        if depth >= self.options.limits.split_depth_limit {
            return;
        }
        if split.cols() > 1 {
            match path.split_first() {
                Some((&col, rest)) => {
                    for child in split.column(col) {
                        self.leaf_layers(child, rest, depth + 1, text, out);
                    }
                }
                // Path exhausted: first non-empty child per split row.
                None => {
                    for row in 0..split.rows() {
                        let first = split
                            .row(row)
                            .map(|child| self.branch_text(child, text))
                            .find(|t| !t.is_empty());
                        out.extend(first);
                    }
                }
            }
        } else {
            for child in split.children() {
                self.leaf_layers(child, path, depth + 1, text, out);
            }
        }
    }

    fn whole_layers(&self, cell: &Cell, depth: usize, text: &TextCache, out: &mut Vec<String>) {
        let Some(split) = cell.as_split() else {
            push_text(cell, text, out);
            return;
        };
        if depth >= self.options.limits.split_depth_limit {
            return;
        }
        if split.cols() > 1 {
            for row in 0..split.rows() {
                let mut branches: Vec<String> = Vec::new();
                for child in split.row(row) {
                    let t = self.branch_text(child, text);
                    if !t.is_empty() && !branches.contains(&t) {
                        branches.push(t);
                    }
                }
                if !branches.is_empty() {
                    out.push(branches.join(&self.options.branch_separator));
                }
            }
        } else {
            for child in split.children() {
                self.whole_layers(child, depth + 1, text, out);
            }
        }
    }

    /// All leaf texts under one branch, joined by the branch separator.
    fn branch_text(&self, cell: &Cell, text: &TextCache) -> String {
        let mut parts = leaf_texts(cell, text, self.options.limits.split_depth_limit);
        dedup_preserving_order(&mut parts);
        parts.join(&self.options.branch_separator)
    }

    fn join_layers(&self, mut layers: Vec<String>) -> Option<String> {
        layers.dedup();
        layers.truncate(self.options.limits.max_name_layers);
        if layers.is_empty() {
            return None;
        }
        Some(layers.join(&self.options.layer_separator))
    }
}

fn push_text(cell: &Cell, text: &TextCache, out: &mut Vec<String>) {
    let t = text.get_or_extract(&cell.content);
    if !t.is_empty() {
        out.push(t);
    }
}

fn dedup_preserving_order(parts: &mut Vec<String>) {
    let mut seen = HashSet::new();
    parts.retain(|p| seen.insert(p.clone()));
}

/// Catalog entries for a grid using default options.
pub fn build_column_catalog(grid: &Grid) -> Vec<ColumnCatalogEntry> {
    ColumnCatalogBuilder::new().build(grid).entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::Row;

    fn header_grid(rows: Vec<Vec<Cell>>) -> Grid {
        Grid {
            rows: rows.into_iter().map(Row::new).collect(),
            header_row: true,
            header_row_count: Some(1),
            ..Grid::default()
        }
    }

    fn names(catalog: &[ColumnCatalogEntry]) -> Vec<&str> {
        catalog.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_plain_header_names() {
        let grid = header_grid(vec![
            vec![Cell::text("Name"), Cell::text("<b>Age</b>")],
            vec![Cell::text("ann"), Cell::text("31")],
        ]);
        let catalog = build_column_catalog(&grid);
        assert_eq!(names(&catalog), vec!["Name", "Age"]);
        assert!(catalog.iter().all(|e| e.kind == CatalogKind::Whole));
    }

    #[test]
    fn test_fallback_names_without_header() {
        let grid = Grid {
            rows: vec![Row::new(vec![Cell::text("1"), Cell::text("2")])],
            ..Grid::default()
        };
        assert_eq!(names(&build_column_catalog(&grid)), vec!["Column 1", "Column 2"]);
    }

    #[test]
    fn test_empty_grid_has_one_column() {
        assert_eq!(names(&build_column_catalog(&Grid::default())), vec!["Column 1"]);
    }

    #[test]
    fn test_nested_leaf_names() {
        let inner = Cell::split(1, 2, vec![Cell::text("x"), Cell::text("y")]);
        let header = Cell::split(2, 2, vec![Cell::text("A"), Cell::text("B"), inner, Cell::text("z")]);
        let grid = header_grid(vec![vec![header], vec![Cell::text("1")]]);
        let catalog = build_column_catalog(&grid);
        let got: Vec<(Option<Vec<usize>>, &str)> = catalog
            .iter()
            .map(|e| (e.leaf_path.clone(), e.name.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (None, "A/B > x/y/z (whole)"),
                (Some(vec![0]), "A > x"),
                (Some(vec![0, 0]), "A > x"),
                (Some(vec![0, 1]), "A > y"),
                (Some(vec![1]), "B > z"),
            ]
        );
    }

    #[test]
    fn test_repeated_labels_collapse() {
        let grid = Grid {
            rows: vec![
                Row::new(vec![Cell::merged("Region", 2, 1), Cell::merged("Sales", 1, 1)]),
                Row::new(vec![Cell::covered(0, 0), Cell::text("Q1")]),
                Row::new(vec![Cell::text("north"), Cell::text("5")]),
            ],
            header_row: true,
            header_row_count: Some(2),
            ..Grid::default()
        };
        assert_eq!(names(&build_column_catalog(&grid)), vec!["Region", "Sales > Q1"]);
    }

    #[test]
    fn test_name_layers_capped() {
        let stacked = Cell::split(
            8,
            1,
            (1..=8).map(|i| Cell::text(format!("L{i}"))).collect(),
        );
        let grid = header_grid(vec![vec![stacked]]);
        assert_eq!(
            names(&build_column_catalog(&grid)),
            vec!["L1 > L2 > L3 > L4 > L5 > L6"]
        );
    }
}
