//! Feature modules of the theme, called after each content swap.

use crate::error::describe;
use docs_nav_traits::ContentHooks;
use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// [`ContentHooks`] backed by JavaScript functions.
///
/// Functions are looked up on the object handed to the navigator, falling back
/// to the window globals the theme scripts install. A missing function is
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct JsHooks {
    target: Option<js_sys::Object>,
}

impl JsHooks {
    pub fn new(target: Option<js_sys::Object>) -> Self {
        Self { target }
    }

    fn call(&self, name: &str) {
        let key = JsValue::from_str(name);
        let receiver: JsValue = match &self.target {
            Some(target) => target.clone().into(),
            None => match web_sys::window() {
                Some(window) => window.into(),
                None => return,
            },
        };
        let Ok(value) = js_sys::Reflect::get(&receiver, &key) else {
            return;
        };
        if let Some(function) = value.dyn_ref::<js_sys::Function>()
            && let Err(err) = function.call0(&receiver)
        {
            warn!("{name} threw: {}", describe(&err));
        }
    }
}

impl ContentHooks for JsHooks {
    fn highlight_code(&self) {
        self.call("initHighlightJS");
    }

    fn init_copy_buttons(&self) {
        self.call("initCopyCodeButtons");
    }

    fn init_smooth_anchors(&self) {
        self.call("initSmoothAnchors");
    }

    fn init_parent_page_handlers(&self) {
        self.call("initParentPageHandlers");
    }

    fn reinit_menu_handlers(&self) {
        self.call("reinitMenuHandlers");
    }
}
