//! JavaScript entry points.
//!
//! Every function takes the host's `{ grid, ruleSets }` document as a JSON
//! string and returns JSON, so the editor can call the engine directly.

use wasm_bindgen::prelude::*;

use crate::catalog::ColumnCatalogBuilder;
use crate::report::build_report;
use crate::types::Document;

fn decode(document_json: &str) -> Result<Document, JsValue> {
    Document::from_json(document_json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build the column catalog of a document's grid
///
/// # Errors
/// Returns an error if the document JSON cannot be decoded.
#[wasm_bindgen]
pub fn column_catalog(document_json: &str) -> Result<String, JsValue> {
    let document = decode(document_json)?;
    let catalog = ColumnCatalogBuilder::new().build(&document.grid);
    serde_json::to_string(&catalog)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Evaluate every body cell and return the catalog with the resolved styles
///
/// # Errors
/// Returns an error if the document JSON cannot be decoded.
#[wasm_bindgen]
pub fn evaluate_document(document_json: &str) -> Result<String, JsValue> {
    let document = decode(document_json)?;
    serde_json::to_string(&build_report(&document))
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
