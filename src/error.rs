//! Structured error types for gridfmt.
//!
//! Only document ingestion and the CLI can fail. Catalog building and rule
//! evaluation degrade to `None`/empty results instead of returning errors.

/// All errors that can occur while decoding a document snapshot.
#[derive(Debug, thiserror::Error)]
pub enum GridfmtError {
    /// JSON decoding error from serde_json.
    #[error("JSON decoding: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridfmtError>;

impl From<String> for GridfmtError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridfmtError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridfmtError> for wasm_bindgen::JsValue {
    fn from(e: GridfmtError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
