#![allow(dead_code)]

use docs_nav::{
    AbortHandle, ContentSource, Crumb, FetchError, InMemoryContentSource, InMemoryDocument,
    NavigationConfig, NavigationSession, PageContent, PageId, TokioClock,
};
use std::rc::Rc;
use std::time::Duration;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub type TestSession = NavigationSession<DelayedSource, InMemoryDocument, TokioClock>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves pages from an [`InMemoryContentSource`] after a network delay.
///
/// The backing source stays shared so tests can inspect the requests made.
pub struct DelayedSource {
    pages: Rc<InMemoryContentSource>,
    delay: Duration,
}

impl ContentSource for DelayedSource {
    async fn fetch_page(&self, id: &PageId, abort: &AbortHandle) -> Result<PageContent, FetchError> {
        tokio::time::sleep(self.delay).await;
        self.pages.fetch_page(id, abort).await
    }

    fn name(&self) -> &'static str {
        "delayed"
    }
}

/// Builds a page whose trail is `trail`; the last label is the page itself.
pub fn page(id: &str, title: &str, trail: &[&str]) -> PageContent {
    let last = trail.len().saturating_sub(1);
    PageContent {
        id: PageId::from(id),
        title: title.to_string(),
        subtitle: None,
        body_html: format!("<h2>About {title}</h2><p>Page {id}.</p><h2>Next steps</h2>"),
        breadcrumb_trail: trail
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let url = (i != last).then(|| format!("/{}/", label.to_lowercase()));
                Crumb::new(*label, url)
            })
            .collect(),
        breadcrumbs_html: None,
        badges_html: None,
        headings: Vec::new(),
        child_pages_html: None,
        has_child_pages: false,
        show_toc: true,
        sidebar_buttons_html: None,
        url: None,
    }
}

pub struct Site {
    pub doc: Rc<InMemoryDocument>,
    pub pages: Rc<InMemoryContentSource>,
    pub session: Rc<TestSession>,
}

impl Site {
    pub fn requests(&self) -> Vec<PageId> {
        self.pages.requests()
    }

    pub fn crumb_labels(&self) -> Vec<String> {
        self.doc.crumbs().into_iter().map(|c| c.label).collect()
    }
}

/// A session over `doc` whose fetches take `delay_ms` of virtual time.
pub fn site(doc: InMemoryDocument, delay_ms: u64) -> Site {
    site_with_config(doc, delay_ms, NavigationConfig::default())
}

pub fn site_with_config(doc: InMemoryDocument, delay_ms: u64, config: NavigationConfig) -> Site {
    init_logging();
    let pages = Rc::new(InMemoryContentSource::new());
    let source = DelayedSource {
        pages: pages.clone(),
        delay: Duration::from_millis(delay_ms),
    };
    let doc = Rc::new(doc);
    let session = Rc::new(NavigationSession::new(
        source,
        doc.clone(),
        Rc::new(TokioClock),
        config,
    ));
    Site { doc, pages, session }
}
