use blockmark_core::{LinkStrategy, Options};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// Renders a JSON block array or editor document into Markdown/MDX.
///
/// `structural_links` defaults to `true`; pass `false` to convert inline
/// anchors with the regex substitution only.
#[wasm_bindgen(js_name = render_markdown)]
pub fn render_markdown(input: &str, structural_links: Option<bool>) -> Result<String, JsError> {
    blockmark_core::convert_json(input, options(structural_links)).map_err(to_js_error)
}

/// Renders an already-parsed editor value (`blocks` array or save object).
///
/// The value is serialized back to JSON so the core parser sees exactly what
/// `JSON.stringify` would produce.
#[wasm_bindgen(js_name = render_blocks)]
pub fn render_blocks(blocks: &JsValue, structural_links: Option<bool>) -> Result<String, JsError> {
    let json = js_sys::JSON::stringify(blocks)
        .map_err(js_value_error)?
        .as_string()
        .ok_or_else(|| JsError::new("blocks could not be serialized to JSON"))?;

    render_markdown(&json, structural_links)
}

/// Returns the version string reported by the core crate.
#[wasm_bindgen]
pub fn version() -> String {
    blockmark_core::version().to_string()
}

fn options(structural_links: Option<bool>) -> Options {
    let link_strategy = if structural_links.unwrap_or(true) {
        LinkStrategy::Structural
    } else {
        LinkStrategy::Pattern
    };

    Options { link_strategy }
}

fn to_js_error<E: ToString>(err: E) -> JsError {
    JsError::new(&err.to_string())
}

fn js_value_error(err: JsValue) -> JsError {
    let message = err
        .as_string()
        .unwrap_or_else(|| "JSON.stringify threw".to_string());
    JsError::new(&message)
}
