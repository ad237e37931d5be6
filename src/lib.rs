//! gridfmt - column catalog and conditional formatting for rich-text grids
//!
//! Works on snapshots of a table whose cells may be merged, covered by a
//! merge, or split into nested sub-grids:
//! - Leaf column paths addressing virtual columns inside split cells
//! - Header depth detection from hints, merge metadata and label shape
//! - A named catalog of every whole and leaf column
//! - Per-cell rule evaluation with priorities, `stopIfTrue` and leaf targets
//!
//! # Usage
//!
//! ```
//! use gridfmt::{build_report, Document};
//!
//! let json = r##"{
//!   "grid": {
//!     "headerRow": true,
//!     "rows": [
//!       { "cells": [{ "content": "Amount" }] },
//!       { "cells": [{ "content": "120" }] }
//!     ]
//!   },
//!   "ruleSets": [{
//!     "target": { "kind": "whole", "topColIndex": 0 },
//!     "rules": [{
//!       "when": { "op": "greaterThan", "value": 100 },
//!       "then": { "backgroundColor": "#fde" }
//!     }]
//!   }]
//! }"##;
//! let document = Document::from_json(json)?;
//! let report = build_report(&document);
//! assert_eq!(report.catalog[0].name, "Amount");
//! assert_eq!(report.styles.len(), 1);
//! # Ok::<(), gridfmt::GridfmtError>(())
//! ```

// Model
pub mod config;
pub mod error;
pub mod grid;
pub mod types;

// Analysis
pub mod catalog;
pub mod header_depth;
pub mod leaf_path;
pub mod value;

// Evaluation
pub mod conditional;
pub mod engine;
pub mod report;

pub mod wasm;

pub use catalog::{build_column_catalog, ColumnCatalog, ColumnCatalogBuilder};
pub use config::{CatalogOptions, EngineLimits, HeaderThresholds};
pub use engine::{get_then, CellRef, RuleEngine};
pub use error::{GridfmtError, Result};
pub use header_depth::{effective_header_row_count, DefaultHeaderHeuristic, HeaderDepthHeuristic};
pub use leaf_path::{
    collect_leaf_col_paths, enumerate_rendered_leaves, leaf_col_path_for_rendered_cell, LeafPath,
};
pub use report::{build_report, CellStyleRecord, Report};
pub use types::*;
pub use value::TextCache;
