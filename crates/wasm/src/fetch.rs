//! Page payloads over the browser Fetch API.

use crate::error::{is_abort_error, network_error};
use docs_nav_core::NavigationConfig;
use docs_nav_traits::{AbortHandle, ContentSource, FetchError};
use docs_nav_types::{PageContent, PageId};
use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Loads pages from `{restUrl}page-content/{id}`, sending the nonce as `X-WP-Nonce`.
///
/// Aborting the [`AbortHandle`] aborts the underlying request through an
/// `AbortController`.
#[derive(Debug, Clone)]
pub struct FetchContentSource {
    config: NavigationConfig,
}

impl FetchContentSource {
    pub fn new(config: NavigationConfig) -> Self {
        Self { config }
    }

    fn request(&self, id: &PageId, signal: &web_sys::AbortSignal) -> Result<web_sys::Request, FetchError> {
        let headers = web_sys::Headers::new().map_err(|e| network_error(id, &e))?;
        if let Some(nonce) = &self.config.nonce {
            headers
                .set("X-WP-Nonce", nonce)
                .map_err(|e| network_error(id, &e))?;
        }

        let opts = web_sys::RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(web_sys::RequestMode::SameOrigin);
        opts.set_headers(&headers);
        opts.set_signal(Some(signal));

        web_sys::Request::new_with_str_and_init(&self.config.page_url(id), &opts)
            .map_err(|e| network_error(id, &e))
    }
}

impl ContentSource for FetchContentSource {
    async fn fetch_page(&self, id: &PageId, abort: &AbortHandle) -> Result<PageContent, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Network {
            page: id.clone(),
            message: "no window object available".to_string(),
        })?;

        let controller = web_sys::AbortController::new().map_err(|e| network_error(id, &e))?;
        {
            let controller = controller.clone();
            abort.on_abort(move || controller.abort());
        }
        let request = self.request(id, &controller.signal())?;
        debug!("fetching page {id} from {}", request.url());

        let rejected = |e: wasm_bindgen::JsValue| {
            if is_abort_error(&e) {
                FetchError::Aborted(id.clone())
            } else {
                network_error(id, &e)
            }
        };

        let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(rejected)?
            .dyn_into()
            .map_err(|v| network_error(id, &v))?;

        if !response.ok() {
            return Err(FetchError::Status {
                page: id.clone(),
                status: response.status(),
            });
        }

        let body = JsFuture::from(response.text().map_err(|e| network_error(id, &e))?)
            .await
            .map_err(rejected)?;
        let body = body.as_string().unwrap_or_default();

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            page: id.clone(),
            message: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "fetch"
    }
}
