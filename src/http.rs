//! Native client for the page-content endpoint.

use docs_nav_core::NavigationConfig;
use docs_nav_traits::{AbortHandle, ContentSource, FetchError};
use docs_nav_types::{PageContent, PageId};
use log::debug;
use reqwest::Client;
use tokio::sync::oneshot;

/// Loads pages over HTTP with `reqwest`.
///
/// Aborting the handle drops the in-flight request.
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: Client,
    config: NavigationConfig,
}

impl HttpContentSource {
    pub fn new(config: NavigationConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: NavigationConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    async fn get(&self, id: &PageId) -> Result<PageContent, FetchError> {
        let url = self.config.page_url(id);
        debug!("GET {url}");

        let mut request = self.client.get(&url);
        if let Some(nonce) = &self.config.nonce {
            request = request.header("X-WP-Nonce", nonce);
        }
        let network = |e: reqwest::Error| FetchError::Network {
            page: id.clone(),
            message: e.to_string(),
        };

        let response = request.send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page: id.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(network)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            page: id.clone(),
            message: e.to_string(),
        })
    }
}

impl ContentSource for HttpContentSource {
    async fn fetch_page(&self, id: &PageId, abort: &AbortHandle) -> Result<PageContent, FetchError> {
        let (tx, rx) = oneshot::channel();
        abort.on_abort(move || {
            tx.send(()).ok();
        });

        tokio::select! {
            biased;
            Ok(()) = rx => Err(FetchError::Aborted(id.clone())),
            result = self.get(id) => result,
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_aborted_before_send() {
        let source = HttpContentSource::new(
            NavigationConfig::default().with_rest_url("http://127.0.0.1:9/wp-json/docs-theme/v1/"),
        );
        let abort = AbortHandle::new();
        abort.abort();

        let err = source
            .fetch_page(&PageId::from("42"), &abort)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Aborted(PageId::from("42")));
    }
}
