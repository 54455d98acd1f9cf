#![deny(missing_docs)]
//! Node.js bindings that surface Blockmark's Rust implementation.

use blockmark_core::Options;
use napi::{Error, Result};
use napi_derive::napi;

/// Returns the version string reported by the core crate.
#[napi]
pub fn version() -> String {
    blockmark_core::version().to_string()
}

/// Converts a JSON block array or editor document into Markdown/MDX.
///
/// Throws with the conversion error message when the document is invalid.
#[napi(js_name = "convertJson")]
pub fn convert_json(json: String) -> Result<String> {
    blockmark_core::convert_json(&json, Options::default())
        .map_err(|err| Error::from_reason(err.to_string()))
}
