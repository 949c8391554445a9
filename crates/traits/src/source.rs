//! ContentSource trait for abstracting page payload loading.
//!
//! The navigation layer asks a source for one page at a time. Requests can be
//! aborted through an [`AbortHandle`]; sources should stop work early when the
//! handle fires, but callers still re-check the handle after a fetch resolves,
//! since an abort racing a completed response cannot be prevented at the source.

use docs_nav_types::{PageContent, PageId};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Error type for page loading operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request for page {0} was aborted")]
    Aborted(PageId),

    #[error("network error loading page {page}: {message}")]
    Network { page: PageId, message: String },

    #[error("page {page} returned HTTP status {status}")]
    Status { page: PageId, status: u16 },

    #[error("malformed payload for page {page}: {message}")]
    Decode { page: PageId, message: String },
}

impl FetchError {
    pub fn is_abort(&self) -> bool {
        matches!(self, FetchError::Aborted(_))
    }
}

#[derive(Default)]
struct AbortInner {
    aborted: Cell<bool>,
    listeners: RefCell<Vec<Box<dyn FnOnce()>>>,
}

/// Cooperative cancellation signal for one in-flight request.
///
/// Cloning shares the signal. Listeners registered with [`AbortHandle::on_abort`]
/// run once, on the first call to [`AbortHandle::abort`].
#[derive(Clone, Default)]
pub struct AbortHandle {
    inner: Rc<AbortInner>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        if self.inner.aborted.replace(true) {
            return;
        }
        let listeners = self.inner.listeners.take();
        for listener in listeners {
            listener();
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.get()
    }

    /// Registers a callback for abortion. Runs immediately if already aborted.
    pub fn on_abort(&self, listener: impl FnOnce() + 'static) {
        if self.is_aborted() {
            listener();
        } else {
            self.inner.listeners.borrow_mut().push(Box::new(listener));
        }
    }

    /// True when both handles share the same signal.
    pub fn same_request(&self, other: &AbortHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for AbortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortHandle")
            .field("aborted", &self.is_aborted())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

/// A source of page payloads.
///
/// # Implementations
///
/// - `InMemoryContentSource`: serves pre-populated pages (always available)
/// - `FetchContentSource`: browser `fetch` against the content endpoint (wasm crate)
/// - `HttpContentSource`: native HTTP client (root crate)
#[allow(async_fn_in_trait)]
pub trait ContentSource {
    /// Load the payload for one page.
    async fn fetch_page(&self, id: &PageId, abort: &AbortHandle) -> Result<PageContent, FetchError>;

    /// Returns a human-readable name for this source (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory content source.
///
/// Pages must be added before use. Pages marked as failing answer with an HTTP 500
/// status; unknown pages answer with 404.
#[derive(Debug, Default)]
pub struct InMemoryContentSource {
    pages: RefCell<HashMap<PageId, PageContent>>,
    failing: RefCell<HashSet<PageId>>,
    requests: RefCell<Vec<PageId>>,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, page: PageContent) {
        self.pages.borrow_mut().insert(page.id.clone(), page);
    }

    pub fn with_page(self, page: PageContent) -> Self {
        self.add(page);
        self
    }

    pub fn fail(&self, id: impl Into<PageId>) {
        self.failing.borrow_mut().insert(id.into());
    }

    /// Every page requested so far, in request order.
    pub fn requests(&self) -> Vec<PageId> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl ContentSource for InMemoryContentSource {
    async fn fetch_page(&self, id: &PageId, abort: &AbortHandle) -> Result<PageContent, FetchError> {
        self.requests.borrow_mut().push(id.clone());
        if abort.is_aborted() {
            Err(FetchError::Aborted(id.clone()))
        } else if self.failing.borrow().contains(id) {
            Err(FetchError::Status {
                page: id.clone(),
                status: 500,
            })
        } else {
            self.pages.borrow().get(id).cloned().ok_or_else(|| FetchError::Status {
                page: id.clone(),
                status: 404,
            })
        }
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn page(id: &str) -> PageContent {
        PageContent {
            id: PageId::from(id),
            title: format!("Page {id}"),
            subtitle: None,
            body_html: String::new(),
            breadcrumb_trail: Vec::new(),
            breadcrumbs_html: None,
            badges_html: None,
            headings: Vec::new(),
            child_pages_html: None,
            has_child_pages: false,
            show_toc: false,
            sidebar_buttons_html: None,
            url: None,
        }
    }

    #[test]
    fn test_abort_runs_listeners_once() {
        let handle = AbortHandle::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        handle.on_abort(move || counter.set(counter.get() + 1));
        handle.abort();
        handle.abort();
        assert!(handle.is_aborted());
        assert_eq!(hits.get(), 1);

        let late = hits.clone();
        handle.on_abort(move || late.set(late.get() + 10));
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn test_clones_share_signal() {
        let handle = AbortHandle::new();
        let other = handle.clone();
        other.abort();
        assert!(handle.is_aborted());
        assert!(handle.same_request(&other));
        assert!(!handle.same_request(&AbortHandle::new()));
    }

    #[test]
    fn test_in_memory_source_statuses() {
        let source = InMemoryContentSource::new().with_page(page("1"));
        source.fail("2");
        let abort = AbortHandle::new();

        let found = block_on(source.fetch_page(&PageId::from("1"), &abort)).unwrap();
        assert_eq!(found.title, "Page 1");

        let failed = block_on(source.fetch_page(&PageId::from("2"), &abort)).unwrap_err();
        assert!(matches!(failed, FetchError::Status { status: 500, .. }));

        let missing = block_on(source.fetch_page(&PageId::from("3"), &abort)).unwrap_err();
        assert!(matches!(missing, FetchError::Status { status: 404, .. }));

        abort.abort();
        let aborted = block_on(source.fetch_page(&PageId::from("1"), &abort)).unwrap_err();
        assert!(aborted.is_abort());
        assert_eq!(source.request_count(), 4);
    }
}
