//! Common test utilities and assertion helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

// Re-export fixtures for convenience
pub use super::fixtures::*;

use gridfmt::{
    ColumnCatalogEntry, ColumnTarget, Condition, Grid, Operator, Rule, RuleSet, StylePatch,
};

// ============================================================================
// Catalog helpers
// ============================================================================

/// `(leaf_path, name)` pairs of a catalog, in order.
pub fn catalog_names(entries: &[ColumnCatalogEntry]) -> Vec<(Option<Vec<usize>>, String)> {
    entries
        .iter()
        .map(|e| (e.leaf_path.clone(), e.name.clone()))
        .collect()
}

/// Name of the catalog entry for `top_col` / `leaf_path`.
pub fn name_of(entries: &[ColumnCatalogEntry], top_col: usize, leaf_path: Option<&[usize]>) -> String {
    entries
        .iter()
        .find(|e| e.top_col_index == top_col && e.leaf_path.as_deref() == leaf_path)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| panic!("no catalog entry for column {top_col} {leaf_path:?}"))
}

// ============================================================================
// Rule helpers
// ============================================================================

pub fn whole(col: usize) -> ColumnTarget {
    ColumnTarget::Whole { top_col_index: col }
}

pub fn leaf(col: usize, path: &[usize]) -> ColumnTarget {
    ColumnTarget::Leaf {
        top_col_index: col,
        leaf_path: path.to_vec(),
    }
}

/// Rule painting the background when the cell is not empty.
pub fn paint(color: &str) -> Rule {
    Rule::new(Condition::new(Operator::IsNotEmpty), StylePatch::background(color))
}

/// Rule painting the background when the cell number exceeds `threshold`.
pub fn paint_above(threshold: f64, color: &str) -> Rule {
    Rule::new(
        Condition::new(Operator::GreaterThan).value(threshold),
        StylePatch::background(color),
    )
}

pub fn rule_set(target: ColumnTarget, rules: Vec<Rule>) -> RuleSet {
    RuleSet::new(target, rules)
}

/// Header row count a grid resolves to with default settings.
pub fn header_depth(grid: &Grid) -> usize {
    gridfmt::effective_header_row_count(grid)
}
