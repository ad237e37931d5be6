//! Tunable limits and thresholds.
//!
//! Defaults reproduce the stock behavior. Hosts can override any field from
//! JSON; missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

/// Maximum hops followed through a chain of covered cells.
pub const COVERED_HOP_LIMIT: usize = 6;
/// Maximum nesting depth walked inside split cells.
pub const SPLIT_DEPTH_LIMIT: usize = 8;
/// Maximum number of rows that may be treated as header.
pub const MAX_HEADER_ROWS: usize = 4;
/// Maximum number of label layers joined into a catalog name.
pub const MAX_NAME_LAYERS: usize = 6;
/// Largest `rows * cols` a persisted split may declare; bigger splits are
/// treated as plain cells.
pub const MAX_SPLIT_CELLS: usize = 4096;

/// Recursion and scan bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineLimits {
    pub covered_hop_limit: usize,
    pub split_depth_limit: usize,
    pub max_header_rows: usize,
    pub max_name_layers: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            covered_hop_limit: COVERED_HOP_LIMIT,
            split_depth_limit: SPLIT_DEPTH_LIMIT,
            max_header_rows: MAX_HEADER_ROWS,
            max_name_layers: MAX_NAME_LAYERS,
        }
    }
}

/// Thresholds used by the header-depth heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderThresholds {
    /// Share of numeric-like labels at which a row is body, not header.
    pub body_numeric_ratio: f64,
    /// Looser ratio applied when a row has at least two labels.
    pub loose_numeric_ratio: f64,
    /// Share of the column count row 1 must label to promote a two-row header.
    pub promote_label_ratio: f64,
    /// Extra distinct labels row 1 needs over row 0 to promote.
    pub promote_min_extra_labels: usize,
}

impl Default for HeaderThresholds {
    fn default() -> Self {
        Self {
            body_numeric_ratio: 0.9,
            loose_numeric_ratio: 0.7,
            promote_label_ratio: 0.6,
            promote_min_extra_labels: 2,
        }
    }
}

/// Everything the catalog builder can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogOptions {
    pub limits: EngineLimits,
    pub thresholds: HeaderThresholds,
    /// Joins label layers of one column (`"Group > Sub"`).
    pub layer_separator: String,
    /// Joins sibling branch labels of a whole column (`"a/b"`).
    pub branch_separator: String,
    /// Appended to a whole-column name when leaf entries exist.
    pub whole_suffix: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            limits: EngineLimits::default(),
            thresholds: HeaderThresholds::default(),
            layer_separator: " > ".to_string(),
            branch_separator: "/".to_string(),
            whole_suffix: " (whole)".to_string(),
        }
    }
}
