//! How many leading rows of a grid are really header.
//!
//! Persisted documents only carry a loose `headerRowCount` hint. The
//! heuristic here combines that hint with merge metadata and with how
//! "numeric" each row's labels look, so that two-row headers the hint
//! under-reports are recovered and body rows that happen to carry merges
//! are not mistaken for header.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{EngineLimits, HeaderThresholds};
use crate::types::{Cell, Grid};
use crate::value::TextCache;

/// A pure number, or a slash-separated list of them (`"10/20"`).
#[allow(clippy::expect_used)]
static NUMERIC_LIKE: Lazy<Regex> = Lazy::new(|| {
    let num = r"[+-]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?";
    Regex::new(&format!(r"^{num}(?:\s*/\s*{num})*$")).expect("valid numeric-like pattern")
});

pub fn is_numeric_like(label: &str) -> bool {
    NUMERIC_LIKE.is_match(label.trim())
}

/// Decides the effective number of header rows for a grid.
pub trait HeaderDepthHeuristic {
    fn header_row_count(&self, grid: &Grid, text: &TextCache) -> usize;
}

/// Label of one cell for header analysis.
///
/// Split cells contribute the non-empty texts of their leaves joined by `/`.
pub fn cell_label(cell: &Cell, text: &TextCache, depth_limit: usize) -> String {
    leaf_texts(cell, text, depth_limit).join("/")
}

/// Non-empty texts of every leaf under `cell`, row-major.
pub fn leaf_texts(cell: &Cell, text: &TextCache, depth_limit: usize) -> Vec<String> {
    let mut parts = Vec::new();
    collect_leaf_texts(cell, text, 0, depth_limit, &mut parts);
    parts
}

fn collect_leaf_texts(
    cell: &Cell,
    text: &TextCache,
    depth: usize,
    depth_limit: usize,
    out: &mut Vec<String>,
) {
    match cell.as_split() {
        Some(split) => {
            if depth >= depth_limit {
                return;
            }
            for child in split.children() {
                collect_leaf_texts(child, text, depth + 1, depth_limit, out);
            }
        }
        None => {
            let t = text.get_or_extract(&cell.content);
            if !t.is_empty() {
                out.push(t);
            }
        }
    }
}

/// Label statistics of one row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowStats {
    /// Non-empty labels.
    pub labels: usize,
    /// Non-empty labels that look numeric.
    pub numeric: usize,
    /// Distinct non-empty labels.
    pub distinct: usize,
    /// At least one merge anchor sits in the row.
    pub has_merge_anchor: bool,
}

impl RowStats {
    pub fn of(grid: &Grid, row: usize, text: &TextCache, depth_limit: usize) -> Self {
        let Some(row) = grid.row(row) else {
            return Self::default();
        };
        let mut stats = Self::default();
        let mut seen = HashSet::new();
        for cell in &row.cells {
            if cell.is_covered() {
                continue;
            }
            stats.has_merge_anchor |= cell.is_merge_anchor();
            let label = cell_label(cell, text, depth_limit);
            if label.is_empty() {
                continue;
            }
            stats.labels += 1;
            if is_numeric_like(&label) {
                stats.numeric += 1;
            }
            seen.insert(label);
        }
        stats.distinct = seen.len();
        stats
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn numeric_ratio(&self) -> f64 {
        if self.labels == 0 {
            return 0.0;
        }
        self.numeric as f64 / self.labels as f64
    }
}

/// Stock heuristic: hint, merge metadata, two-row promotion, numeric demotion.
#[derive(Debug, Clone, Default)]
pub struct DefaultHeaderHeuristic {
    pub limits: EngineLimits,
    pub thresholds: HeaderThresholds,
}

impl DefaultHeaderHeuristic {
    pub fn new(limits: EngineLimits, thresholds: HeaderThresholds) -> Self {
        Self { limits, thresholds }
    }

    fn is_body(&self, stats: &RowStats) -> bool {
        stats.labels >= 1 && stats.numeric_ratio() >= self.thresholds.body_numeric_ratio
    }

    fn is_trailing_body(&self, stats: &RowStats) -> bool {
        self.is_body(stats)
            || (stats.labels >= 2 && stats.numeric_ratio() >= self.thresholds.loose_numeric_ratio)
    }

    /// Row 0 carries merges and row 1 labels most columns with clearly more
    /// distinct labels: a two-row header the hint missed.
    #[allow(clippy::cast_precision_loss)]
    fn promotes_second_row(&self, grid: &Grid, stats: &[RowStats]) -> bool {
        let (Some(first), Some(second)) = (stats.first(), stats.get(1)) else {
            return false;
        };
        let min_labels = self.thresholds.promote_label_ratio * grid.column_count() as f64;
        first.has_merge_anchor
            && second.labels as f64 >= min_labels
            && second.distinct >= first.distinct + self.thresholds.promote_min_extra_labels
    }
}

impl HeaderDepthHeuristic for DefaultHeaderHeuristic {
    fn header_row_count(&self, grid: &Grid, text: &TextCache) -> usize {
        let scan = self.limits.max_header_rows.min(grid.rows.len());
        let base = if grid.header_row {
            grid.header_row_count.unwrap_or(1)
        } else {
            0
        }
        .min(scan);

        let stats: Vec<RowStats> = (0..scan)
            .map(|r| RowStats::of(grid, r, text, self.limits.split_depth_limit))
            .collect();

        let mut meta_depth = 0;
        for (r, row) in stats.iter().enumerate() {
            if r >= base && self.is_body(row) {
                break;
            }
            if row.has_merge_anchor {
                meta_depth = r + 1;
            }
        }

        let mut effective = base.max(meta_depth);
        if effective < 2 && self.promotes_second_row(grid, &stats) {
            effective = 2;
        }

        let cap = effective.min(scan);
        for (r, row) in stats.iter().enumerate().take(cap).skip(1) {
            if r >= base && self.is_trailing_body(row) {
                log::debug!("row {r} looks like body, header depth {cap} -> {r}");
                return r;
            }
        }
        cap
    }
}

/// Effective header row count using the stock heuristic and defaults.
pub fn effective_header_row_count(grid: &Grid) -> usize {
    DefaultHeaderHeuristic::default().header_row_count(grid, &TextCache::new())
}
