use serde::{Deserialize, Serialize};

use super::{Grid, RuleSet};
use crate::error::Result;

/// Grid snapshot bundled with the rule sets authored against it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub grid: Grid,
    /// Rule sets that fail to decode are dropped; they never reject the document.
    #[serde(default, deserialize_with = "super::formatting::lenient_list")]
    pub rule_sets: Vec<RuleSet>,
}

impl Document {
    /// Decode a `{ "grid": ..., "ruleSets": [...] }` JSON bundle.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the grid shape is wrong.
    /// Malformed rule sets and rules are dropped instead.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
