//! Shared helpers for WASM API operations
//!
//! Conversion between JS values and the crate's config/error types, with the
//! error logged before it crosses into JavaScript.

use std::fmt::Display;

use wasm_bindgen::prelude::*;

use crate::config::RevealConfig;

/// Log `e` with context and turn it into a JS error string
pub fn to_js_error(context: &str, e: impl Display) -> JsValue {
    let msg = format!("{}: {}", context, e);
    log::error!("{}", msg);
    JsValue::from_str(&msg)
}

/// Read a config object. `undefined` and `null` mean "all defaults".
pub fn deserialize_config(value: JsValue) -> Result<RevealConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(RevealConfig::default());
    }
    let config: RevealConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| to_js_error("Invalid reveal config", e))?;
    config
        .validate()
        .map_err(|e| to_js_error("Invalid reveal config", e))?;
    Ok(config)
}

/// Serialize the active config back to a plain JS object
pub fn serialize_config(config: &RevealConfig) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(config).map_err(|e| to_js_error("Serialization error", e))
}
