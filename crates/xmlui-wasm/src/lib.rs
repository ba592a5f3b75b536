//! WASM bindings for the XMLUI markup parser.
//!
//! Exposes `parse_errors()` to JavaScript via wasm-bindgen. Returns an array
//! of `{ code, message, pos, end }` objects, empty for well-formed input.

use wasm_bindgen::prelude::*;

/// Parse XMLUI markup and return its syntax errors.
///
/// Offsets are UTF-8 byte offsets into `source`.
#[wasm_bindgen]
pub fn parse_errors(source: &str) -> Result<JsValue, JsError> {
    let result = xmlui_parser::parse(source);
    serde_wasm_bindgen::to_value(&result.errors).map_err(to_js_error)
}

fn to_js_error(e: serde_wasm_bindgen::Error) -> JsError {
    JsError::new(&e.to_string())
}

/// Parse XMLUI markup and return the whole syntax tree as a JS object.
#[wasm_bindgen]
pub fn parse_tree(source: &str) -> Result<JsValue, JsError> {
    let result = xmlui_parser::parse(source);
    let tree = serde_wasm_bindgen::to_value(&result.node).map_err(to_js_error)?;
    let errors = serde_wasm_bindgen::to_value(&result.errors).map_err(to_js_error)?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"node".into(), &tree)
        .map_err(|_| JsError::new("Failed to set node property"))?;
    js_sys::Reflect::set(&js_obj, &"errors".into(), &errors)
        .map_err(|_| JsError::new("Failed to set errors property"))?;

    Ok(js_obj.into())
}

/// Get the parser version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
