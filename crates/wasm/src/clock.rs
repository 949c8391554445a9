use docs_nav_traits::Clock;
use js_sys::{Function, Promise};
use std::time::Duration;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Clock backed by `setTimeout` and `requestAnimationFrame`.
///
/// Without a window both waits resolve immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

fn resolve_now(resolve: &Function) {
    resolve.call0(&JsValue::NULL).ok();
}

impl Clock for BrowserClock {
    async fn sleep(&self, duration: Duration) {
        let ms = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window()
                && window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .is_ok()
            {
                return;
            }
            resolve_now(&resolve);
        });
        JsFuture::from(promise).await.ok();
    }

    async fn next_frame(&self) {
        let promise = Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window()
                && window.request_animation_frame(&resolve).is_ok()
            {
                return;
            }
            resolve_now(&resolve);
        });
        JsFuture::from(promise).await.ok();
    }
}
