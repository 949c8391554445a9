//! WebAssembly bindings for docs-nav.
//!
//! This crate runs the async page navigation and the table of contents inside
//! the browser, on top of the platform-agnostic `docs-nav-core` session.
//!
//! # Architecture
//!
//! The core never touches a browser API. This crate supplies the browser side of
//! every seam:
//!
//! - [`document`] - `BrowserDocument`, the DOM contract over `web-sys`
//! - [`fetch`] - `FetchContentSource`, page payloads via `fetch` + `AbortController`
//! - [`clock`] - `BrowserClock`, `setTimeout` and `requestAnimationFrame` waits
//! - [`hooks`] - `JsHooks`, the theme's feature functions
//! - [`navigator`] - `DocsNavigator`, the JavaScript handle and event wiring
//! - [`error`] - Error types with JavaScript interop
//!
//! Everything runs on the page's event loop. Navigations and scroll handling are
//! spawned with `wasm_bindgen_futures::spawn_local`.
//!
//! # Example
//!
//! ```javascript
//! import init, { DocsNavigator } from '@docs-nav/wasm';
//!
//! await init();
//!
//! const navigator = new DocsNavigator(window.docsThemeAsync);
//! navigator.start();
//! ```

mod clock;
mod document;
mod error;
mod fetch;
mod hooks;
mod navigator;

pub use clock::BrowserClock;
pub use document::BrowserDocument;
pub use error::{ErrorCode, WasmError};
pub use fetch::FetchContentSource;
pub use hooks::JsHooks;
pub use navigator::DocsNavigator;

use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// This function sets up panic hooks for better error messages in the browser console.
/// It is called automatically when using wasm-pack's generated JavaScript.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }
}

/// Get the version of the docs-nav-wasm library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
