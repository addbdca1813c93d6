//! WebAssembly bindings for typetrace
//!
//! Bundlers and loaders call into this crate to rewrite modules before
//! they run. The hook object the rewritten code calls is provided by the
//! host page.
//!
//! Usage:
//! - Call `instrument(source, path)` to rewrite a module against the
//!   default hook binding
//! - Call `instrument_with_config(source, path, toml)` to use a project
//!   configuration

use typetrace::{Config, Instrumenter, TraceError};
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(err: TraceError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Rewrite `source`, loaded from `path`, so its functions report to
/// `globalThis.__typetrace`.
///
/// # Errors
/// Throws a string naming the module when the source does not parse
#[wasm_bindgen]
pub fn instrument(source: &str, path: &str) -> Result<String, JsValue> {
    typetrace::instrument(source, path).map_err(to_js_error)
}

/// Same as [`instrument`] with the hook binding, e.g. `window.tracer`
#[wasm_bindgen(js_name = instrumentWithHooks)]
pub fn instrument_with_hooks(source: &str, path: &str, hooks: &str) -> Result<String, JsValue> {
    Instrumenter::with_options(hooks)
        .and_then(|i| i.instrument(source, path))
        .map_err(to_js_error)
}

/// Same as [`instrument`] configured from a TOML document
#[wasm_bindgen(js_name = instrumentWithConfig)]
pub fn instrument_with_config(
    source: &str,
    path: &str,
    config_toml: &str,
) -> Result<String, JsValue> {
    instrument_configured(source, path, config_toml).map_err(to_js_error)
}

fn instrument_configured(source: &str, path: &str, config_toml: &str) -> Result<String, TraceError> {
    let config = Config::from_toml_str(config_toml)?;
    Instrumenter::from_config(&config)?.instrument(source, path)
}

/// Validate a TOML configuration and return it as a plain object.
/// Returns null if it does not parse.
#[wasm_bindgen(js_name = parseConfig)]
pub fn parse_config(config_toml: &str) -> JsValue {
    config_json(config_toml)
        .and_then(|json| serde_json::from_str::<serde_json::Value>(&json).ok())
        .and_then(|value| serde_wasm_bindgen::to_value(&value).ok())
        .unwrap_or(JsValue::NULL)
}

/// Configuration as JSON, or None if the TOML does not parse
fn config_json(config_toml: &str) -> Option<String> {
    let config = Config::from_toml_str(config_toml).ok()?;
    serde_json::to_string(&config).ok()
}

/// Get the version of the instrumenter
#[wasm_bindgen]
pub fn get_version() -> String {
    typetrace::version().to_string()
}
