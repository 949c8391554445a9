//! An in-memory document implementing every DOM seam.
//!
//! Mutations are applied to plain Rust state and appended to an event log so that
//! tests can assert on both the end state and the order of changes.

use crate::dom::{BreadcrumbView, BrowserHistory, CrumbItem, PageView, Region, TocView, Viewport};
use crate::markup::{ScannedLink, scan_headings, scan_links};
use docs_nav_types::{
    HistoryState, PageId, RawHeading, ScrollBehavior, ScrollMetrics, SidebarLayout, TocEntry,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// One observable mutation of an [`InMemoryDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    RegionFaded(Region, bool),
    TitleSet(String),
    SubtitleSet(Option<String>),
    BodySet,
    BadgesSet(Option<String>),
    SidebarApplied(SidebarLayout),
    DocumentTitleSet(String),
    LoadingShown(String),
    LoadingHiding,
    LoadingRemoved,
    CurrentPageMarked(PageId),
    HeadingIdSet(usize, String),
    LinkTagged(String, PageId),
    CrumbFadedOut(usize),
    CrumbsTruncated(usize),
    CrumbPushed(String),
    CrumbFadedIn(usize),
    CrumbCurrent(usize, bool),
    TrailInserted,
    TocRendered(usize),
    TocLinkActive(String, bool),
    ScrolledTo(f64, ScrollBehavior),
    HistoryPushed(PageId, String),
    HistoryReplaced(PageId, String),
    FragmentReplaced(String),
    LocationAssigned(String),
}

#[derive(Debug, Clone)]
struct RenderedCrumb {
    item: CrumbItem,
    faded: bool,
}

#[derive(Debug, Clone)]
struct Loading {
    text: String,
    hiding: bool,
}

#[derive(Debug, Default)]
struct TocState {
    entries: Vec<TocEntry>,
    active: HashSet<String>,
    renders: usize,
}

#[derive(Debug, Default)]
struct State {
    regions: HashSet<Region>,
    faded: HashSet<Region>,
    title: String,
    subtitle: Option<String>,
    body: String,
    headings: Vec<RawHeading>,
    content_links: Vec<ScannedLink>,
    badges: Option<String>,
    sidebar: Option<(SidebarLayout, Option<String>)>,
    document_title: String,
    loading: Option<Loading>,
    current_page: Option<PageId>,
    sidebar_links: Vec<ScannedLink>,
    breadcrumb_wrapper: bool,
    crumbs: Option<Vec<RenderedCrumb>>,
    trail_html: Option<String>,
    toc: Option<TocState>,
    metrics: ScrollMetrics,
    width: f64,
    boxes: HashMap<String, (f64, f64)>,
    url: String,
    history: Vec<(HistoryState, String)>,
    assigned: Option<String>,
    events: Vec<DomEvent>,
}

/// A document held entirely in memory.
///
/// A fresh document has every region, a breadcrumb wrapper without a trail, a TOC
/// container and a desktop-width viewport. Builder methods remove or seed parts.
#[derive(Debug)]
pub struct InMemoryDocument {
    state: RefCell<State>,
}

impl Default for InMemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocument {
    pub fn new() -> Self {
        let state = State {
            regions: Region::ALL.into_iter().collect(),
            breadcrumb_wrapper: true,
            toc: Some(TocState::default()),
            metrics: ScrollMetrics::new(0.0, 800.0, 800.0),
            width: 1280.0,
            url: "https://docs.example.com/".to_string(),
            document_title: "Docs – Example Site".to_string(),
            ..State::default()
        };
        Self {
            state: RefCell::new(state),
        }
    }

    pub fn with_url(self, url: &str) -> Self {
        self.state.borrow_mut().url = url.to_string();
        self
    }

    pub fn with_document_title(self, title: &str) -> Self {
        self.state.borrow_mut().document_title = title.to_string();
        self
    }

    pub fn with_body(self, html: &str) -> Self {
        self.load_body(html);
        self
    }

    pub fn with_title(self, title: &str) -> Self {
        self.state.borrow_mut().title = title.to_string();
        self
    }

    /// Seeds a rendered trail; the last label is the current page.
    pub fn with_crumbs(self, labels: &[&str]) -> Self {
        let last = labels.len().saturating_sub(1);
        let crumbs = labels
            .iter()
            .enumerate()
            .map(|(i, label)| RenderedCrumb {
                item: CrumbItem {
                    label: label.to_string(),
                    href: (i != last).then(|| format!("/{}/", label.to_lowercase())),
                    current: i == last,
                },
                faded: false,
            })
            .collect();
        self.state.borrow_mut().crumbs = Some(crumbs);
        self
    }

    pub fn without_region(self, region: Region) -> Self {
        self.state.borrow_mut().regions.remove(&region);
        self
    }

    pub fn without_breadcrumbs(self) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.breadcrumb_wrapper = false;
            state.crumbs = None;
        }
        self
    }

    pub fn without_toc(self) -> Self {
        self.state.borrow_mut().toc = None;
        self
    }

    /// Adds a sidebar navigation link.
    pub fn with_sidebar_link(self, href: &str, id: impl Into<PageId>) -> Self {
        self.state.borrow_mut().sidebar_links.push(ScannedLink {
            href: href.to_string(),
            page_id: Some(id.into()),
        });
        self
    }

    pub fn with_current_page(self, id: impl Into<PageId>) -> Self {
        self.state.borrow_mut().current_page = Some(id.into());
        self
    }

    pub fn with_loading(self, text: &str) -> Self {
        self.show_loading(text);
        self.clear_events();
        self
    }

    pub fn set_metrics(&self, metrics: ScrollMetrics) {
        self.state.borrow_mut().metrics = metrics;
    }

    pub fn set_width(&self, width: f64) {
        self.state.borrow_mut().width = width;
    }

    /// Places the element with this id at an absolute offset.
    pub fn set_element_box(&self, id: &str, top: f64, height: f64) {
        self.state.borrow_mut().boxes.insert(id.to_string(), (top, height));
    }

    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn subtitle(&self) -> Option<String> {
        self.state.borrow().subtitle.clone()
    }

    pub fn body(&self) -> String {
        self.state.borrow().body.clone()
    }

    pub fn badges(&self) -> Option<String> {
        self.state.borrow().badges.clone()
    }

    pub fn sidebar(&self) -> Option<(SidebarLayout, Option<String>)> {
        self.state.borrow().sidebar.clone()
    }

    pub fn is_faded(&self, region: Region) -> bool {
        self.state.borrow().faded.contains(&region)
    }

    pub fn loading_text(&self) -> Option<String> {
        self.state.borrow().loading.as_ref().map(|l| l.text.clone())
    }

    /// True once the loading overlay has started fading out.
    pub fn loading_hiding(&self) -> bool {
        self.state.borrow().loading.as_ref().is_some_and(|l| l.hiding)
    }

    pub fn crumbs(&self) -> Vec<CrumbItem> {
        self.state
            .borrow()
            .crumbs
            .iter()
            .flatten()
            .map(|c| c.item.clone())
            .collect()
    }

    /// Indices of crumbs currently in their faded state.
    pub fn faded_crumbs(&self) -> Vec<usize> {
        self.state
            .borrow()
            .crumbs
            .iter()
            .flatten()
            .enumerate()
            .filter_map(|(i, c)| c.faded.then_some(i))
            .collect()
    }

    pub fn trail_html(&self) -> Option<String> {
        self.state.borrow().trail_html.clone()
    }

    pub fn toc_entries(&self) -> Vec<TocEntry> {
        self.state
            .borrow()
            .toc
            .as_ref()
            .map(|t| t.entries.clone())
            .unwrap_or_default()
    }

    pub fn toc_renders(&self) -> usize {
        self.state.borrow().toc.as_ref().map_or(0, |t| t.renders)
    }

    /// Anchors of TOC links carrying the active class, sorted.
    pub fn active_links(&self) -> Vec<String> {
        let state = self.state.borrow();
        let mut active: Vec<String> = state
            .toc
            .iter()
            .flat_map(|t| t.active.iter().cloned())
            .collect();
        active.sort();
        active
    }

    pub fn headings(&self) -> Vec<RawHeading> {
        self.state.borrow().headings.clone()
    }

    pub fn content_links(&self) -> Vec<ScannedLink> {
        self.state.borrow().content_links.clone()
    }

    pub fn url(&self) -> String {
        self.state.borrow().url.clone()
    }

    pub fn history(&self) -> Vec<(HistoryState, String)> {
        self.state.borrow().history.clone()
    }

    pub fn assigned_location(&self) -> Option<String> {
        self.state.borrow().assigned.clone()
    }

    pub fn scroll_top(&self) -> f64 {
        self.state.borrow().metrics.scroll_top
    }

    pub fn events(&self) -> Vec<DomEvent> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Position of the first event matching `pred`.
    pub fn position_of(&self, pred: impl Fn(&DomEvent) -> bool) -> Option<usize> {
        self.state.borrow().events.iter().position(pred)
    }

    fn load_body(&self, html: &str) {
        let mut state = self.state.borrow_mut();
        state.body = html.to_string();
        state.headings = scan_headings(html);
        state.content_links = scan_links(html);
    }

    fn record(&self, event: DomEvent) {
        self.state.borrow_mut().events.push(event);
    }
}

impl PageView for InMemoryDocument {
    fn region_exists(&self, region: Region) -> bool {
        self.state.borrow().regions.contains(&region)
    }

    fn set_region_faded(&self, region: Region, faded: bool) {
        {
            let mut state = self.state.borrow_mut();
            if !state.regions.contains(&region) {
                return;
            }
            if faded {
                state.faded.insert(region);
            } else {
                state.faded.remove(&region);
            }
        }
        self.record(DomEvent::RegionFaded(region, faded));
    }

    fn page_title(&self) -> String {
        self.title()
    }

    fn set_title(&self, text: &str) {
        if !self.region_exists(Region::Title) {
            return;
        }
        self.state.borrow_mut().title = text.to_string();
        self.record(DomEvent::TitleSet(text.to_string()));
    }

    fn set_subtitle_html(&self, html: Option<&str>) {
        let mut state = self.state.borrow_mut();
        if html.is_some() && !state.regions.contains(&Region::Subtitle) {
            if !state.regions.contains(&Region::Title) {
                return;
            }
            state.regions.insert(Region::Subtitle);
        }
        state.subtitle = html.map(str::to_string);
        state
            .events
            .push(DomEvent::SubtitleSet(html.map(str::to_string)));
    }

    fn set_body_html(&self, html: &str) {
        if !self.region_exists(Region::Content) {
            return;
        }
        self.load_body(html);
        self.record(DomEvent::BodySet);
    }

    fn set_badges_html(&self, html: Option<&str>) {
        self.state.borrow_mut().badges = html.map(str::to_string);
        self.record(DomEvent::BadgesSet(html.map(str::to_string)));
    }

    fn apply_sidebar(&self, layout: SidebarLayout, buttons_html: Option<&str>) {
        {
            let mut state = self.state.borrow_mut();
            if layout.is_visible() {
                state.regions.insert(Region::RightSidebar);
            }
            state.sidebar = Some((layout, buttons_html.map(str::to_string)));
        }
        self.record(DomEvent::SidebarApplied(layout));
    }

    fn document_title(&self) -> String {
        self.state.borrow().document_title.clone()
    }

    fn set_document_title(&self, title: &str) {
        self.state.borrow_mut().document_title = title.to_string();
        self.record(DomEvent::DocumentTitleSet(title.to_string()));
    }

    fn show_loading(&self, text: &str) {
        self.state.borrow_mut().loading = Some(Loading {
            text: text.to_string(),
            hiding: false,
        });
        self.record(DomEvent::LoadingShown(text.to_string()));
    }

    fn begin_hide_loading(&self) -> bool {
        let present = match self.state.borrow_mut().loading.as_mut() {
            Some(loading) => {
                loading.hiding = true;
                true
            }
            None => false,
        };
        if present {
            self.record(DomEvent::LoadingHiding);
        }
        present
    }

    fn remove_loading(&self) {
        if self.state.borrow_mut().loading.take().is_some() {
            self.record(DomEvent::LoadingRemoved);
        }
    }

    fn current_page_id(&self) -> Option<PageId> {
        self.state.borrow().current_page.clone()
    }

    fn mark_current_page(&self, id: &PageId) {
        self.state.borrow_mut().current_page = Some(id.clone());
        self.record(DomEvent::CurrentPageMarked(id.clone()));
    }

    fn content_headings(&self) -> Vec<RawHeading> {
        self.headings()
    }

    fn set_heading_id(&self, index: usize, id: &str) {
        if let Some(heading) = self.state.borrow_mut().headings.get_mut(index) {
            heading.id = Some(id.to_string());
        } else {
            return;
        }
        self.record(DomEvent::HeadingIdSet(index, id.to_string()));
    }

    fn untagged_content_links(&self) -> Vec<(usize, String)> {
        self.state
            .borrow()
            .content_links
            .iter()
            .enumerate()
            .filter(|(_, link)| link.page_id.is_none())
            .map(|(i, link)| (i, link.href.clone()))
            .collect()
    }

    fn tag_content_link(&self, index: usize, id: &PageId) {
        let href = {
            let mut state = self.state.borrow_mut();
            let Some(link) = state.content_links.get_mut(index) else {
                return;
            };
            link.page_id = Some(id.clone());
            link.href.clone()
        };
        self.record(DomEvent::LinkTagged(href, id.clone()));
    }

    fn page_id_for_href(&self, href: &str) -> Option<PageId> {
        let state = self.state.borrow();
        state
            .sidebar_links
            .iter()
            .chain(state.content_links.iter())
            .find(|link| link.href == href && link.page_id.is_some())
            .and_then(|link| link.page_id.clone())
    }
}

impl BreadcrumbView for InMemoryDocument {
    fn has_breadcrumb_wrapper(&self) -> bool {
        self.state.borrow().breadcrumb_wrapper
    }

    fn crumb_labels(&self) -> Option<Vec<String>> {
        self.state
            .borrow()
            .crumbs
            .as_ref()
            .map(|crumbs| crumbs.iter().map(|c| c.item.label.trim().to_string()).collect())
    }

    fn fade_out_crumb(&self, index: usize) {
        if let Some(crumb) = self
            .state
            .borrow_mut()
            .crumbs
            .as_mut()
            .and_then(|crumbs| crumbs.get_mut(index))
        {
            crumb.faded = true;
        } else {
            return;
        }
        self.record(DomEvent::CrumbFadedOut(index));
    }

    fn truncate_crumbs(&self, len: usize) {
        if let Some(crumbs) = self.state.borrow_mut().crumbs.as_mut() {
            crumbs.truncate(len);
        } else {
            return;
        }
        self.record(DomEvent::CrumbsTruncated(len));
    }

    fn push_crumb(&self, item: &CrumbItem) {
        {
            let mut state = self.state.borrow_mut();
            if !state.breadcrumb_wrapper {
                return;
            }
            state.crumbs.get_or_insert_with(Vec::new).push(RenderedCrumb {
                item: item.clone(),
                faded: true,
            });
        }
        self.record(DomEvent::CrumbPushed(item.label.clone()));
    }

    fn fade_in_crumb(&self, index: usize) {
        if let Some(crumb) = self
            .state
            .borrow_mut()
            .crumbs
            .as_mut()
            .and_then(|crumbs| crumbs.get_mut(index))
        {
            crumb.faded = false;
        } else {
            return;
        }
        self.record(DomEvent::CrumbFadedIn(index));
    }

    fn set_crumb_current(&self, index: usize, item: &CrumbItem) {
        {
            let mut state = self.state.borrow_mut();
            let Some(crumb) = state.crumbs.as_mut().and_then(|c| c.get_mut(index)) else {
                return;
            };
            if crumb.item.current == item.current {
                return;
            }
            crumb.item.current = item.current;
            crumb.item.href = if item.current { None } else { item.href.clone() };
        }
        self.record(DomEvent::CrumbCurrent(index, item.current));
    }

    fn insert_trail_html(&self, html: &str) {
        {
            let mut state = self.state.borrow_mut();
            if !state.breadcrumb_wrapper {
                return;
            }
            state.trail_html = Some(html.to_string());
        }
        self.record(DomEvent::TrailInserted);
    }
}

impl TocView for InMemoryDocument {
    fn has_toc_container(&self) -> bool {
        self.state.borrow().toc.is_some()
    }

    fn render_toc(&self, entries: &[TocEntry]) {
        {
            let mut state = self.state.borrow_mut();
            let Some(toc) = state.toc.as_mut() else {
                return;
            };
            toc.entries = entries.to_vec();
            toc.active.clear();
            toc.renders += 1;
        }
        self.record(DomEvent::TocRendered(entries.len()));
    }

    fn is_link_active(&self, anchor: &str) -> bool {
        self.state
            .borrow()
            .toc
            .as_ref()
            .is_some_and(|t| t.active.contains(anchor))
    }

    fn set_link_active(&self, anchor: &str, active: bool) {
        {
            let mut state = self.state.borrow_mut();
            let Some(toc) = state.toc.as_mut() else {
                return;
            };
            if !toc.entries.iter().any(|e| e.anchor_id == anchor) {
                return;
            }
            if active {
                toc.active.insert(anchor.to_string());
            } else {
                toc.active.remove(anchor);
            }
        }
        self.record(DomEvent::TocLinkActive(anchor.to_string(), active));
    }
}

impl Viewport for InMemoryDocument {
    fn metrics(&self) -> ScrollMetrics {
        self.state.borrow().metrics
    }

    fn viewport_width(&self) -> f64 {
        self.state.borrow().width
    }

    fn element_box(&self, id: &str) -> Option<(f64, f64)> {
        self.state.borrow().boxes.get(id).copied()
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        {
            let mut state = self.state.borrow_mut();
            let max = state.metrics.max_scroll();
            state.metrics.scroll_top = top.clamp(0.0, max);
        }
        self.record(DomEvent::ScrolledTo(top, behavior));
    }
}

impl BrowserHistory for InMemoryDocument {
    fn push_state(&self, state: &HistoryState, url: &str) {
        {
            let mut inner = self.state.borrow_mut();
            inner.history.push((state.clone(), url.to_string()));
            inner.url = url.to_string();
        }
        self.record(DomEvent::HistoryPushed(state.page_id.clone(), url.to_string()));
    }

    fn replace_state(&self, state: &HistoryState, url: &str) {
        {
            let mut inner = self.state.borrow_mut();
            match inner.history.last_mut() {
                Some(last) => *last = (state.clone(), url.to_string()),
                None => inner.history.push((state.clone(), url.to_string())),
            }
            inner.url = url.to_string();
        }
        self.record(DomEvent::HistoryReplaced(state.page_id.clone(), url.to_string()));
    }

    fn replace_fragment(&self, anchor: &str) {
        {
            let mut state = self.state.borrow_mut();
            let base = state.url.split('#').next().unwrap_or_default().to_string();
            state.url = format!("{base}#{anchor}");
        }
        self.record(DomEvent::FragmentReplaced(anchor.to_string()));
    }

    fn current_url(&self) -> String {
        self.url()
    }

    fn current_path(&self) -> String {
        path_of(&self.state.borrow().url)
    }

    fn assign_location(&self, url: &str) {
        self.state.borrow_mut().assigned = Some(url.to_string());
        self.record(DomEvent::LocationAssigned(url.to_string()));
    }
}

/// Path component of an absolute or root-relative URL.
fn path_of(url: &str) -> String {
    let after_scheme = match url.find("://") {
        Some(i) => {
            let rest = &url[i + 3..];
            rest.find('/').map_or("", |j| &rest[j..])
        }
        None => url,
    };
    let path = after_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
