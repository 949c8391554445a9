//! Error handling for WASM bindings.
//!
//! Binding errors become JavaScript `Error` objects with a `code` property.

use docs_nav_traits::FetchError;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Error codes for TypeScript consumption.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Settings object could not be read
    Config,
    /// The page has no window or document
    Dom,
    /// A page id argument was blank
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG_ERROR",
            ErrorCode::Dom => "DOM_ERROR",
            ErrorCode::InvalidPage => "INVALID_PAGE",
        }
    }
}

/// A JavaScript-friendly error type.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct WasmError {
    code: ErrorCode,
    message: String,
}

impl WasmError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Config, message)
    }

    pub fn dom(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Dom, message)
    }

    pub fn invalid_page(raw: &str) -> Self {
        Self::new(ErrorCode::InvalidPage, format!("'{raw}' is not a page id"))
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_wasm_bindgen::Error> for WasmError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<WasmError> for JsValue {
    fn from(err: WasmError) -> Self {
        let js_error = js_sys::Error::new(&err.message);
        js_sys::Reflect::set(&js_error, &"code".into(), &JsValue::from_str(err.code.as_str())).ok();
        js_error.into()
    }
}

/// Message text of a rejected promise value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// True for the `DOMException` a fetch rejects with after `AbortController::abort`.
pub(crate) fn is_abort_error(value: &JsValue) -> bool {
    js_sys::Reflect::get(value, &"name".into())
        .ok()
        .and_then(|name| name.as_string())
        .is_some_and(|name| name == "AbortError")
}

pub(crate) fn network_error(page: &docs_nav_types::PageId, value: &JsValue) -> FetchError {
    FetchError::Network {
        page: page.clone(),
        message: describe(value),
    }
}
