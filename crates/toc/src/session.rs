//! Async driver for the table of contents.
//!
//! The host spawns one future per browser event (`scroll`, `resize`, TOC click).
//! Each handler takes a fresh generation token before it waits; when it wakes up
//! with a stale token a newer event has superseded it and it returns without
//! touching the document. That gives trailing-edge debouncing without timers that
//! need to be cancelled.

use crate::indexer::index_document;
use crate::renderer::TocRenderer;
use crate::tracker::{ScrollConfig, ScrollTracker};
use docs_nav_traits::{Clock, DocumentSurface};
use docs_nav_types::{HeadingDescriptor, ScrollBehavior};
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
struct Token(Cell<u64>);

impl Token {
    fn next(&self) -> u64 {
        let value = self.0.get().wrapping_add(1);
        self.0.set(value);
        value
    }

    fn is_current(&self, value: u64) -> bool {
        self.0.get() == value
    }
}

pub struct TocSession<D, C> {
    doc: Rc<D>,
    clock: Rc<C>,
    config: ScrollConfig,
    tracker: RefCell<ScrollTracker>,
    renderer: RefCell<TocRenderer>,
    frame_pending: Cell<bool>,
    suppressed: Cell<bool>,
    settle: Token,
    resize: Token,
    programmatic: Token,
}

impl<D: DocumentSurface, C: Clock> TocSession<D, C> {
    pub fn new(doc: Rc<D>, clock: Rc<C>, config: ScrollConfig) -> Self {
        Self {
            doc,
            clock,
            config,
            tracker: RefCell::new(ScrollTracker::new(config)),
            renderer: RefCell::new(TocRenderer::new()),
            frame_pending: Cell::new(false),
            suppressed: Cell::new(false),
            settle: Token::default(),
            resize: Token::default(),
            programmatic: Token::default(),
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Re-indexes the content, re-renders the TOC and snapshots heading layout.
    ///
    /// Pending debounced work and any programmatic-scroll suppression from the
    /// previous content are discarded.
    pub fn rebuild(&self) -> Vec<HeadingDescriptor> {
        self.settle.next();
        self.resize.next();
        self.programmatic.next();
        self.suppressed.set(false);

        let headings = index_document(self.doc.as_ref());
        if !self.doc.has_toc_container() {
            self.tracker.borrow_mut().clear();
            self.renderer.borrow_mut().render(self.doc.as_ref(), "", &[]);
            return headings;
        }

        self.renderer
            .borrow_mut()
            .render(self.doc.as_ref(), &self.doc.page_title(), &headings);
        let anchors = headings.iter().map(|h| h.anchor_id.clone()).collect();
        self.tracker.borrow_mut().track(self.doc.as_ref(), anchors);
        debug!("table of contents rebuilt with {} headings", headings.len());

        self.refresh_active(true);
        headings
    }

    /// Handles a scroll event: at most one recompute per paint frame, then a
    /// layout re-snapshot once scrolling has settled.
    pub async fn on_scroll(&self) {
        let token = self.settle.next();

        if !self.frame_pending.replace(true) {
            self.clock.next_frame().await;
            self.frame_pending.set(false);
            self.refresh_active(false);
        }

        self.clock.sleep(self.config.settle_debounce()).await;
        if self.settle.is_current(token) {
            self.tracker.borrow_mut().refresh(self.doc.as_ref());
            self.refresh_active(false);
        }
    }

    pub async fn on_resize(&self) {
        let token = self.resize.next();
        self.clock.sleep(self.config.resize_debounce()).await;
        if self.resize.is_current(token) {
            self.tracker.borrow_mut().refresh(self.doc.as_ref());
            self.refresh_active(false);
        }
    }

    /// Smooth-scrolls to a TOC entry without adding a history entry.
    ///
    /// The clicked link becomes active at once and tracking stays suppressed until
    /// the scroll is expected to be over, then recomputes from the final position.
    /// Returns false when the anchor is not present in the page.
    pub async fn scroll_to_anchor(&self, anchor: &str) -> bool {
        let Some(target) = TocRenderer::scroll_target(self.doc.as_ref(), anchor, &self.config) else {
            debug!("no element for TOC anchor {anchor:?}");
            return false;
        };

        let token = self.programmatic.next();
        self.suppressed.set(true);
        self.doc.replace_fragment(anchor);
        {
            let renderer = self.renderer.borrow();
            if renderer.contains(anchor) {
                renderer.set_active(self.doc.as_ref(), Some(anchor));
                self.tracker.borrow_mut().set_active(Some(anchor.to_string()));
            }
        }
        self.doc.scroll_to(target, ScrollBehavior::Smooth);

        self.clock.sleep(self.config.programmatic_scroll()).await;
        if self.programmatic.is_current(token) {
            self.suppressed.set(false);
            self.tracker.borrow_mut().refresh(self.doc.as_ref());
            self.refresh_active(true);
        }
        true
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed.get()
    }

    pub fn active_anchor(&self) -> Option<String> {
        self.tracker.borrow().active().map(str::to_string)
    }

    pub fn headings_tracked(&self) -> usize {
        self.tracker.borrow().positions().len()
    }

    /// Recomputes the active heading and updates the links.
    ///
    /// `force` re-applies link state even when the active heading did not change.
    fn refresh_active(&self, force: bool) {
        if self.suppressed.get() {
            return;
        }
        let metrics = self.doc.metrics();
        let mut tracker = self.tracker.borrow_mut();
        let changed = tracker.update(&metrics).is_some();
        if changed || force {
            self.renderer
                .borrow()
                .set_active(self.doc.as_ref(), tracker.active());
        }
    }
}
