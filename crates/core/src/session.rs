//! The navigation session: one per loaded document.
//!
//! A navigation runs as a single future. It is guarded by a `navigating` flag
//! (a second request while one runs is ignored) and stamped with a generation
//! number. [`NavigationSession::cancel`] bumps the generation and aborts the
//! in-flight fetch; the stale future notices the mismatch at its next checkpoint
//! and stops without touching the document again.

use crate::breadcrumbs::{BreadcrumbAnimator, page_items, target_items};
use crate::cache::PageCache;
use crate::config::NavigationConfig;
use crate::error::NavigationError;
use crate::links::{LinkClick, NavigationRequest, tag_content_links};
use crate::swap::ContentSwap;
use docs_nav_toc::TocSession;
use docs_nav_traits::{AbortHandle, Clock, ContentHooks, ContentSource, DocumentSurface, NoopHooks};
use docs_nav_types::{HistoryState, PageContent, PageId, ScrollBehavior};
use log::{debug, info, warn};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

/// How a call to [`NavigationSession::navigate_to`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The new page is shown.
    Completed { from_cache: bool },
    /// Another navigation was already running; nothing happened.
    Ignored,
    /// The navigation was superseded before it finished.
    Cancelled,
    /// Loading failed and the browser was sent to the page the regular way.
    FellBack,
}

pub struct NavigationSession<S, D, C, H = NoopHooks> {
    source: S,
    doc: Rc<D>,
    clock: Rc<C>,
    hooks: H,
    config: NavigationConfig,
    toc: Rc<TocSession<D, C>>,
    cache: RefCell<PageCache>,
    navigating: Cell<bool>,
    generation: Cell<u64>,
    in_flight: RefCell<Option<AbortHandle>>,
    active_page: RefCell<Option<PageId>>,
}

/// Releases the navigating state when a navigation future finishes or is dropped,
/// unless a cancellation already handed the session to a newer navigation.
struct NavigatingGuard<'a> {
    navigating: &'a Cell<bool>,
    generation: &'a Cell<u64>,
    in_flight: &'a RefCell<Option<AbortHandle>>,
    owner: u64,
}

impl Drop for NavigatingGuard<'_> {
    fn drop(&mut self) {
        if self.generation.get() == self.owner {
            self.navigating.set(false);
            self.in_flight.borrow_mut().take();
        }
    }
}

impl<S, D, C> NavigationSession<S, D, C, NoopHooks>
where
    S: ContentSource,
    D: DocumentSurface,
    C: Clock,
{
    pub fn new(source: S, doc: Rc<D>, clock: Rc<C>, config: NavigationConfig) -> Self {
        let toc = Rc::new(TocSession::new(doc.clone(), clock.clone(), config.scroll));
        Self {
            source,
            doc,
            clock,
            hooks: NoopHooks,
            cache: RefCell::new(PageCache::new(config.cache_capacity)),
            config,
            toc,
            navigating: Cell::new(false),
            generation: Cell::new(0),
            in_flight: RefCell::new(None),
            active_page: RefCell::new(None),
        }
    }
}

impl<S, D, C, H> NavigationSession<S, D, C, H>
where
    S: ContentSource,
    D: DocumentSurface,
    C: Clock,
    H: ContentHooks,
{
    pub fn with_hooks<H2: ContentHooks>(self, hooks: H2) -> NavigationSession<S, D, C, H2> {
        NavigationSession {
            source: self.source,
            doc: self.doc,
            clock: self.clock,
            hooks,
            config: self.config,
            toc: self.toc,
            cache: self.cache,
            navigating: self.navigating,
            generation: self.generation,
            in_flight: self.in_flight,
            active_page: self.active_page,
        }
    }

    /// Prepares the session for the page it was created on.
    ///
    /// Returns false on viewports too narrow for async navigation; the host should
    /// then leave clicks and history events alone. Otherwise the current history
    /// entry is stamped with the page id so that coming back to it works.
    pub fn init(&self) -> bool {
        if !self.config.allows_viewport(self.doc.viewport_width()) {
            info!(
                "viewport {}px wide, async navigation disabled",
                self.doc.viewport_width()
            );
            return false;
        }

        if let Some(id) = self.doc.current_page_id() {
            if self.doc.current_path() != "/" {
                self.doc
                    .replace_state(&HistoryState::new(id.clone()), &self.doc.current_url());
            }
            *self.active_page.borrow_mut() = Some(id);
        }
        true
    }

    /// Request for a link click, or `None` when the browser should handle it.
    pub fn request_for_click(&self, click: LinkClick) -> Option<NavigationRequest> {
        click.into_request(&self.doc.current_url())
    }

    /// Request for a `popstate` event, or `None` when the entry has no page id.
    pub fn request_for_history(&self, state: Option<&HistoryState>) -> Option<NavigationRequest> {
        NavigationRequest::from_history(state, &self.doc.current_url())
    }

    /// Shows another page without a full reload.
    ///
    /// Never fails: a transport error sends the browser to `request.url`, a
    /// superseded navigation stops silently.
    pub async fn navigate_to(&self, request: NavigationRequest) -> NavigationOutcome {
        if self.navigating.get() {
            debug!("navigation to page {} ignored, another one is running", request.page_id);
            return NavigationOutcome::Ignored;
        }
        self.navigating.set(true);
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        if let Some(previous) = self.in_flight.borrow_mut().take() {
            previous.abort();
        }
        let _guard = NavigatingGuard {
            navigating: &self.navigating,
            generation: &self.generation,
            in_flight: &self.in_flight,
            owner: generation,
        };

        match self.run(generation, &request).await {
            Ok(from_cache) => {
                debug!("navigated to page {} (cached: {from_cache})", request.page_id);
                NavigationOutcome::Completed { from_cache }
            }
            Err(NavigationError::Cancelled(page)) => {
                debug!("navigation to page {page} cancelled");
                NavigationOutcome::Cancelled
            }
            Err(err) => {
                warn!("{err}; loading {} without async navigation", request.url);
                self.doc.assign_location(&request.url);
                NavigationOutcome::FellBack
            }
        }
    }

    /// Abandons the running navigation, if any.
    ///
    /// The in-flight fetch is aborted and the navigating flag released at once, so
    /// the next request proceeds. Nothing of the abandoned page reaches the
    /// document after this call.
    pub fn cancel(&self) -> bool {
        if !self.navigating.get() {
            return false;
        }
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(handle) = self.in_flight.borrow_mut().take() {
            handle.abort();
        }
        self.navigating.set(false);
        self.doc.remove_loading();
        debug!("running navigation cancelled");
        true
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating.get()
    }

    pub fn active_page(&self) -> Option<PageId> {
        self.active_page.borrow().clone()
    }

    pub fn cache(&self) -> Ref<'_, PageCache> {
        self.cache.borrow()
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn toc(&self) -> &Rc<TocSession<D, C>> {
        &self.toc
    }

    pub fn document(&self) -> &Rc<D> {
        &self.doc
    }

    async fn run(&self, generation: u64, request: &NavigationRequest) -> Result<bool, NavigationError> {
        let id = &request.page_id;
        let live = || self.generation.get() == generation;
        let animator = BreadcrumbAnimator::new(
            self.doc.as_ref(),
            self.clock.as_ref(),
            self.config.breadcrumb_stagger(),
        )
        .with_guard(&live);

        let removal = async {
            if let Some(target) = &request.target_breadcrumbs {
                let labels: Vec<&str> = target.iter().map(|c| c.title.as_str()).collect();
                animator.remove_diverging(&labels).await;
            }
        };
        let ((), acquired) = futures::join!(removal, self.acquire(generation, request));
        let (page, from_cache) = acquired?;
        self.checkpoint(generation, id)?;

        let had_trail = self.doc.crumb_labels().is_some();
        let swap = ContentSwap::new(self.doc.as_ref(), self.clock.as_ref(), &self.config);
        swap.fade_out().await;
        self.checkpoint(generation, id)?;

        swap.apply(&page);
        if request.target_breadcrumbs.is_none() && !had_trail {
            animator.insert_immediately(&page_items(&page), page.breadcrumbs_html.as_deref());
        }
        swap.fade_in(&page).await;
        self.checkpoint(generation, id)?;

        if !from_cache {
            self.hide_loading(generation).await;
            self.checkpoint(generation, id)?;
        }

        match &request.target_breadcrumbs {
            Some(target) => animator.append_missing(&target_items(target, &page)).await,
            None if had_trail => {
                animator
                    .animate_change(&page_items(&page), page.breadcrumbs_html.as_deref())
                    .await
            }
            None => {}
        }
        self.checkpoint(generation, id)?;

        self.doc.mark_current_page(id);
        *self.active_page.borrow_mut() = Some(id.clone());

        self.reinitialize(generation, id).await?;
        self.doc.scroll_to(0.0, ScrollBehavior::Smooth);
        Ok(from_cache)
    }

    /// Cache lookup or cancellable fetch, then the history entry for the page.
    async fn acquire(
        &self,
        generation: u64,
        request: &NavigationRequest,
    ) -> Result<(Rc<PageContent>, bool), NavigationError> {
        let id = &request.page_id;
        let cached = self.cache.borrow().get(id);
        let (page, from_cache) = match cached {
            Some(page) => {
                debug!("page {id} served from cache");
                (page, true)
            }
            None => {
                self.doc.show_loading(&self.config.loading_text);
                let abort = AbortHandle::new();
                *self.in_flight.borrow_mut() = Some(abort.clone());

                let fetched = self.source.fetch_page(id, &abort).await;
                if abort.is_aborted() {
                    return Err(NavigationError::Cancelled(id.clone()));
                }
                self.checkpoint(generation, id)?;

                let page = Rc::new(fetched?);
                self.cache.borrow_mut().put(id.clone(), page.clone());
                (page, false)
            }
        };

        if request.push_history {
            self.doc.push_state(&HistoryState::new(id.clone()), &request.url);
        }
        Ok((page, from_cache))
    }

    async fn hide_loading(&self, generation: u64) {
        if self.doc.begin_hide_loading() {
            self.clock.sleep(self.config.loading_fade()).await;
            // After a cancel the overlay may already belong to the next navigation.
            if self.generation.get() == generation {
                self.doc.remove_loading();
            }
        }
    }

    /// Re-runs everything that depends on the content region.
    async fn reinitialize(&self, generation: u64, id: &PageId) -> Result<(), NavigationError> {
        self.hooks.highlight_code();
        self.hooks.init_copy_buttons();
        self.hooks.init_smooth_anchors();
        self.hooks.init_parent_page_handlers();
        tag_content_links(self.doc.as_ref());

        // Measure headings only once the new content has been laid out.
        self.clock.next_frame().await;
        self.checkpoint(generation, id)?;
        self.toc.rebuild();
        self.hooks.reinit_menu_handlers();
        Ok(())
    }

    fn checkpoint(&self, generation: u64, id: &PageId) -> Result<(), NavigationError> {
        if self.generation.get() == generation {
            Ok(())
        } else {
            Err(NavigationError::Cancelled(id.clone()))
        }
    }
}
