use serde::{Deserialize, Serialize};

use super::ColumnTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogKind {
    Whole,
    Leaf,
}

/// One addressable column offered to rule authoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCatalogEntry {
    pub kind: CatalogKind,
    pub top_col_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf_path: Option<Vec<usize>>,
    /// Display name, e.g. `"Q1 > Revenue"` or `"Column 3"`.
    pub name: String,
}

impl ColumnCatalogEntry {
    /// Target a rule set would use to address this entry.
    pub fn target(&self) -> ColumnTarget {
        match (&self.kind, &self.leaf_path) {
            (CatalogKind::Leaf, Some(path)) => ColumnTarget::Leaf {
                top_col_index: self.top_col_index,
                leaf_path: path.clone(),
            },
            _ => ColumnTarget::Whole {
                top_col_index: self.top_col_index,
            },
        }
    }
}
