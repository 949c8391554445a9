use crate::cache::DEFAULT_CAPACITY;
use docs_nav_toc::ScrollConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings of the async navigation layer.
///
/// Deserialises from the page's `docsThemeAsync` settings object; every field is
/// optional and falls back to the values below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Base of the REST namespace, ending in `/`. Pages load from `{rest_url}page-content/{id}`.
    pub rest_url: String,
    /// Sent as `X-WP-Nonce` with every content request.
    pub nonce: Option<String>,
    pub loading_text: String,
    pub cache_capacity: usize,
    pub fade_ms: u64,
    /// Pause between writing new content and fading it back in.
    pub settle_ms: u64,
    pub loading_fade_ms: u64,
    pub breadcrumb_stagger_ms: u64,
    /// Viewports this wide or narrower keep regular page loads.
    pub min_viewport_width: f64,
    pub scroll: ScrollConfig,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            rest_url: "/wp-json/docs-theme/v1/".to_string(),
            nonce: None,
            loading_text: "Loading...".to_string(),
            cache_capacity: DEFAULT_CAPACITY,
            fade_ms: 200,
            settle_ms: 50,
            loading_fade_ms: 200,
            breadcrumb_stagger_ms: 100,
            min_viewport_width: 768.0,
            scroll: ScrollConfig::default(),
        }
    }
}

impl NavigationConfig {
    pub fn with_rest_url(mut self, rest_url: impl Into<String>) -> Self {
        self.rest_url = rest_url.into();
        self
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn with_loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = text.into();
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_min_viewport_width(mut self, width: f64) -> Self {
        self.min_viewport_width = width;
        self
    }

    pub fn with_scroll(mut self, scroll: ScrollConfig) -> Self {
        self.scroll = scroll;
        self
    }

    /// Endpoint URL for one page.
    pub fn page_url(&self, id: &docs_nav_types::PageId) -> String {
        if self.rest_url.ends_with('/') {
            format!("{}page-content/{id}", self.rest_url)
        } else {
            format!("{}/page-content/{id}", self.rest_url)
        }
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn loading_fade(&self) -> Duration {
        Duration::from_millis(self.loading_fade_ms)
    }

    pub fn breadcrumb_stagger(&self) -> Duration {
        Duration::from_millis(self.breadcrumb_stagger_ms)
    }

    /// Async navigation stays off on narrow viewports.
    pub fn allows_viewport(&self, width: f64) -> bool {
        width > self.min_viewport_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_nav_types::PageId;

    #[test]
    fn test_reads_localized_settings() {
        let config: NavigationConfig = serde_json::from_str(
            r#"{"restUrl":"https://docs.example.com/wp-json/docs-theme/v1/","nonce":"abc123","loadingText":"Laden..."}"#,
        )
        .unwrap();
        assert_eq!(config.nonce.as_deref(), Some("abc123"));
        assert_eq!(config.loading_text, "Laden...");
        assert_eq!(config.cache_capacity, 20);
        assert_eq!(
            config.page_url(&PageId::from("42")),
            "https://docs.example.com/wp-json/docs-theme/v1/page-content/42"
        );
    }

    #[test]
    fn test_viewport_gate() {
        let config = NavigationConfig::default();
        assert!(!config.allows_viewport(768.0));
        assert!(config.allows_viewport(769.0));
        assert!(!config.with_min_viewport_width(1024.0).allows_viewport(900.0));
    }

    #[test]
    fn test_rest_url_without_trailing_slash() {
        let config = NavigationConfig::default().with_rest_url("http://localhost:8080/api");
        assert_eq!(
            config.page_url(&PageId::from("7")),
            "http://localhost:8080/api/page-content/7"
        );
    }
}
