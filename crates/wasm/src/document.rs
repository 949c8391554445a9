//! The rendered page, reached through `web-sys`.
//!
//! Selectors and generated markup follow the docs theme's templates. Every lookup
//! that misses leaves the page alone.

use crate::error::WasmError;
use docs_nav_traits::markup::escape_html;
use docs_nav_traits::{
    BreadcrumbView, BrowserHistory, CrumbItem, PageView, Region, TocView, Viewport,
};
use docs_nav_types::{
    HeadingLevel, HistoryState, PageId, RawHeading, ScrollBehavior, ScrollMetrics, SidebarLayout,
    TocEntry,
};
use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

const CONTENT: &str = ".entry-content";
const TITLE: &str = ".entry-title";
const SUBTITLE: &str = ".page-subtitle";
const RIGHT_SIDEBAR: &str = ".docs-sidebar-right";
const SITE_MAIN: &str = ".site-main";
const TOC_SECTION: &str = ".sidebar-toc-section";
const BREADCRUMB_WRAPPER: &str = ".docs-breadcrumbs-wrapper";
const BREADCRUMBS: &str = ".docs-breadcrumbs";
const CRUMB_LIST: &str = ".docs-breadcrumbs__list";
const CRUMB_ITEM: &str = ".docs-breadcrumbs__item";
const CRUMB_CURRENT: &str = ".docs-breadcrumbs__current";
const BADGES: &str = ".docs-badges-wrapper";
const TOC_CONTAINER: &str = "table-of-contents";
const TOC_LINK: &str = ".docs-toc__link";
const LOADING_OVERLAY: &str = ".async-loader-overlay";
const CONTENT_HEADINGS: &str = ".entry-content h2, .entry-content h3, .entry-content h4";
const CONTENT_LINKS: &str = ".entry-content a, .docs-page-card";

const TOC_SECTION_HTML: &str = r#"<div class="sidebar-toc-section"><h4 class="toc-title">Table of contents</h4><nav class="docs-toc" id="table-of-contents"></nav></div>"#;
const TRAIL_HTML: &str =
    r#"<nav class="docs-breadcrumbs" aria-label="Breadcrumb"><ul class="docs-breadcrumbs__list"></ul></nav>"#;
const NO_HEADINGS_HTML: &str = r#"<p class="no-headings">No headings found</p>"#;

/// Transition rules the fades rely on, injected once per page.
pub fn transition_css(fade_ms: u64, stagger_ms: u64) -> String {
    format!(
        ".entry-content,.entry-title,.page-subtitle,.docs-sidebar-right{{transition:opacity {fade_ms}ms ease,transform {fade_ms}ms ease}}\
         .docs-breadcrumbs__item{{transition:opacity {stagger_ms}ms ease,transform {stagger_ms}ms ease}}\
         .async-loader-overlay{{position:fixed;inset:0;z-index:9999;display:flex;align-items:center;justify-content:center;opacity:0;background:rgba(0,0,0,0);transition:opacity 200ms ease,background 200ms ease}}\
         .async-loader-overlay.is-visible{{opacity:1;background:rgba(0,0,0,.5)}}\
         .async-loader{{display:flex;align-items:center;gap:var(--spacing-md);padding:var(--spacing-md) var(--spacing-lg);border-radius:12px;background:var(--color-widget-bg);box-shadow:0 8px 24px rgba(0,0,0,.15)}}\
         .async-loader-spinner{{width:24px;height:24px;flex-shrink:0;border:3px solid var(--color-border-ui);border-top-color:var(--color-accent);border-radius:50%;animation:async-spin .75s linear infinite}}\
         @keyframes async-spin{{to{{transform:rotate(360deg)}}}}"
    )
}

/// Quotes a value for use inside a `[attr="..."]` selector.
fn attr_value(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

fn set_styles(element: &Element, styles: &[(&str, &str)]) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let style = element.style();
        for (name, value) in styles {
            style.set_property(name, value).ok();
        }
    }
}

fn text_of(element: &Element) -> String {
    element.text_content().unwrap_or_default().trim().to_string()
}

#[derive(Debug, Clone)]
pub struct BrowserDocument {
    window: Window,
    document: Document,
}

impl BrowserDocument {
    pub fn new() -> Result<Self, WasmError> {
        let window = web_sys::window().ok_or_else(|| WasmError::dom("no window object available"))?;
        let document = window
            .document()
            .ok_or_else(|| WasmError::dom("window has no document"))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn install_styles(&self, css: &str) {
        let Some(head) = self.document.head() else {
            return;
        };
        if let Ok(style) = self.document.create_element("style") {
            style.set_text_content(Some(css));
            head.append_child(&style).ok();
        }
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn region(&self, region: Region) -> Option<Element> {
        self.query(match region {
            Region::Content => CONTENT,
            Region::Title => TITLE,
            Region::Subtitle => SUBTITLE,
            Region::RightSidebar => RIGHT_SIDEBAR,
        })
    }

    fn trail(&self) -> Option<Element> {
        self.query(BREADCRUMB_WRAPPER)?
            .query_selector(BREADCRUMBS)
            .ok()
            .flatten()
    }

    fn crumb_items(&self) -> Vec<Element> {
        let Some(trail) = self.trail() else {
            return Vec::new();
        };
        let Ok(nodes) = trail.query_selector_all(CRUMB_ITEM) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn crumb_list(&self) -> Option<Element> {
        let wrapper = self.query(BREADCRUMB_WRAPPER)?;
        if self.trail().is_none() {
            wrapper.insert_adjacent_html("afterbegin", TRAIL_HTML).ok()?;
        }
        let trail = self.trail()?;
        if let Ok(Some(list)) = trail.query_selector(CRUMB_LIST) {
            return Some(list);
        }
        let list = self.document.create_element("ul").ok()?;
        list.set_class_name("docs-breadcrumbs__list");
        trail.append_child(&list).ok()?;
        Some(list)
    }

    /// The link or current-page span inside a crumb.
    fn crumb_inner(&self, item: &CrumbItem) -> Option<Element> {
        let inner = if item.current {
            let span = self.document.create_element("span").ok()?;
            span.set_class_name("docs-breadcrumbs__current");
            span.set_attribute("aria-current", "page").ok()?;
            span
        } else {
            let link = self.document.create_element("a").ok()?;
            link.set_class_name("docs-breadcrumbs__link");
            link.set_attribute("href", item.href.as_deref().unwrap_or("#")).ok()?;
            link
        };
        inner.set_text_content(Some(&item.label));
        Some(inner)
    }

    fn toc_links(&self) -> Vec<Element> {
        let Some(container) = self.document.get_element_by_id(TOC_CONTAINER) else {
            return Vec::new();
        };
        let Ok(nodes) = container.query_selector_all(TOC_LINK) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn toc_link(&self, anchor: &str) -> Option<Element> {
        let href = format!("#{anchor}");
        self.toc_links()
            .into_iter()
            .find(|link| link.get_attribute("href").as_deref() == Some(href.as_str()))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn write_history(&self, state: &HistoryState, url: &str, replace: bool) {
        let Ok(history) = self.window.history() else {
            return;
        };
        let value = match serde_wasm_bindgen::to_value(state) {
            Ok(value) => value,
            Err(err) => {
                warn!("history state for page {} not stored: {err}", state.page_id);
                JsValue::NULL
            }
        };
        let written = if replace {
            history.replace_state_with_url(&value, "", Some(url))
        } else {
            history.push_state_with_url(&value, "", Some(url))
        };
        if written.is_err() {
            warn!("history entry for {url} rejected by the browser");
        }
    }
}

impl PageView for BrowserDocument {
    fn region_exists(&self, region: Region) -> bool {
        self.region(region).is_some()
    }

    fn set_region_faded(&self, region: Region, faded: bool) {
        if let Some(element) = self.region(region) {
            if faded {
                set_styles(&element, &[("opacity", "0"), ("transform", "translateY(10px)")]);
            } else {
                set_styles(&element, &[("opacity", "1"), ("transform", "translateY(0)")]);
            }
        }
    }

    fn page_title(&self) -> String {
        self.region(Region::Title)
            .map(|title| text_of(&title))
            .unwrap_or_default()
    }

    fn set_title(&self, text: &str) {
        if let Some(title) = self.region(Region::Title) {
            title.set_text_content(Some(text));
            if title.id().is_empty() {
                title.set_id("page-title");
            }
        }
    }

    fn set_subtitle_html(&self, html: Option<&str>) {
        match (self.region(Region::Subtitle), html) {
            (Some(subtitle), Some(html)) => {
                subtitle.set_inner_html(html);
                set_styles(&subtitle, &[("display", "block")]);
            }
            (Some(subtitle), None) => set_styles(&subtitle, &[("display", "none")]),
            (None, Some(html)) => {
                if let Some(title) = self.region(Region::Title) {
                    let markup = format!("<p class=\"page-subtitle\">{html}</p>");
                    title.insert_adjacent_html("afterend", &markup).ok();
                }
            }
            (None, None) => {}
        }
    }

    fn set_body_html(&self, html: &str) {
        if let Some(content) = self.region(Region::Content) {
            content.set_inner_html(html);
        }
    }

    fn set_badges_html(&self, html: Option<&str>) {
        let mut wrapper = self.query(BREADCRUMB_WRAPPER);
        if wrapper.is_none()
            && html.is_some()
            && let Some(article) = self.query("article")
        {
            article
                .insert_adjacent_html("afterbegin", r#"<div class="docs-breadcrumbs-wrapper"></div>"#)
                .ok();
            wrapper = self.query(BREADCRUMB_WRAPPER);
        }
        let Some(wrapper) = wrapper else {
            return;
        };

        let existing = wrapper.query_selector(BADGES).ok().flatten();
        match (existing, html) {
            (Some(badges), Some(html)) => badges.set_outer_html(html),
            (None, Some(html)) => {
                wrapper.insert_adjacent_html("beforeend", html).ok();
            }
            (Some(badges), None) => badges.remove(),
            (None, None) => {}
        }
    }

    fn apply_sidebar(&self, layout: SidebarLayout, buttons_html: Option<&str>) {
        let sidebar = self.region(Region::RightSidebar);
        let SidebarLayout::Visible { toc, buttons } = layout else {
            if let Some(sidebar) = sidebar {
                set_styles(&sidebar, &[("display", "none")]);
            }
            return;
        };

        let Some(sidebar) = sidebar else {
            let Some(main) = self.query(SITE_MAIN) else {
                debug!("no .site-main to attach the right sidebar to");
                return;
            };
            let Ok(aside) = self.document.create_element("aside") else {
                return;
            };
            aside.set_class_name("docs-sidebar-right");
            let mut inner = String::new();
            if toc {
                inner.push_str(TOC_SECTION_HTML);
            }
            if buttons && let Some(html) = buttons_html {
                inner.push_str(html);
            }
            aside.set_inner_html(&inner);
            set_styles(&aside, &[("opacity", "0"), ("transform", "translateY(10px)")]);
            main.insert_adjacent_element("afterend", &aside).ok();
            return;
        };

        set_styles(&sidebar, &[("display", "")]);
        match (sidebar.query_selector(TOC_SECTION).ok().flatten(), toc) {
            (Some(section), true) => set_styles(&section, &[("display", "")]),
            (Some(section), false) => set_styles(&section, &[("display", "none")]),
            (None, true) => {
                sidebar.insert_adjacent_html("afterbegin", TOC_SECTION_HTML).ok();
            }
            (None, false) => {}
        }
        set_styles(&sidebar, &[("opacity", "0"), ("transform", "translateY(10px)")]);
    }

    fn document_title(&self) -> String {
        self.document.title()
    }

    fn set_document_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn show_loading(&self, text: &str) {
        self.remove_loading();
        let Some(body) = self.document.body() else {
            return;
        };
        let Ok(overlay) = self.document.create_element("div") else {
            return;
        };
        overlay.set_class_name("async-loader-overlay");
        overlay.set_inner_html(&format!(
            "<div class=\"async-loader\"><div class=\"async-loader-spinner\"></div><span>{}</span></div>",
            escape_html(text)
        ));
        if body.append_child(&overlay).is_err() {
            return;
        }

        let reveal = Closure::once_into_js(move || {
            overlay.class_list().add_1("is-visible").ok();
        });
        self.window
            .request_animation_frame(reveal.unchecked_ref())
            .ok();
    }

    fn begin_hide_loading(&self) -> bool {
        match self.query(LOADING_OVERLAY) {
            Some(overlay) => {
                overlay.class_list().remove_1("is-visible").ok();
                true
            }
            None => false,
        }
    }

    fn remove_loading(&self) {
        for overlay in self.query_all(LOADING_OVERLAY) {
            overlay.remove();
        }
    }

    fn current_page_id(&self) -> Option<PageId> {
        self.query(".current-page .page-link[data-page-id]")?
            .get_attribute("data-page-id")
            .and_then(|raw| PageId::parse(&raw))
    }

    fn mark_current_page(&self, id: &PageId) {
        for item in self.query_all(".current-page") {
            item.class_list().remove_1("current-page").ok();
        }
        for item in self.query_all(".active-parent") {
            item.class_list().remove_1("active-parent").ok();
        }

        let selector = format!("a[data-page-id=\"{}\"]", attr_value(id.as_str()));
        let Some(page_item) = self
            .query(&selector)
            .and_then(|link| link.closest(".page-item").ok().flatten())
        else {
            return;
        };
        page_item.class_list().add_1("current-page").ok();

        let mut cursor = page_item.parent_element();
        while let Some(element) = cursor {
            if element.class_list().contains("children") {
                set_styles(&element, &[("display", "block")]);
                if let Some(toggle) = element
                    .previous_element_sibling()
                    .and_then(|sibling| sibling.query_selector(".toggle-children").ok().flatten())
                {
                    toggle.set_attribute("aria-expanded", "true").ok();
                }
                if let Ok(Some(parent_item)) = element.closest(".page-item") {
                    parent_item.class_list().add_1("active-parent").ok();
                }
            }
            cursor = element.parent_element();
        }
    }

    fn content_headings(&self) -> Vec<RawHeading> {
        self.query_all(CONTENT_HEADINGS)
            .iter()
            .filter_map(|element| {
                let level = match element.tag_name().to_ascii_lowercase().as_str() {
                    "h2" => HeadingLevel::H2,
                    "h3" => HeadingLevel::H3,
                    "h4" => HeadingLevel::H4,
                    _ => return None,
                };
                let id = element.id();
                Some(RawHeading {
                    level,
                    id: (!id.is_empty()).then_some(id),
                    text: text_of(element),
                })
            })
            .collect()
    }

    fn set_heading_id(&self, index: usize, id: &str) {
        if let Some(heading) = self.query_all(CONTENT_HEADINGS).get(index) {
            heading.set_id(id);
        }
    }

    fn untagged_content_links(&self) -> Vec<(usize, String)> {
        self.query_all(CONTENT_LINKS)
            .iter()
            .enumerate()
            .filter(|(_, link)| !link.has_attribute("data-page-id"))
            .filter_map(|(i, link)| link.get_attribute("href").map(|href| (i, href)))
            .collect()
    }

    fn tag_content_link(&self, index: usize, id: &PageId) {
        if let Some(link) = self.query_all(CONTENT_LINKS).get(index) {
            link.set_attribute("data-page-id", id.as_str()).ok();
        }
    }

    fn page_id_for_href(&self, href: &str) -> Option<PageId> {
        let selector = format!("a[href=\"{}\"][data-page-id]", attr_value(href));
        self.query(&selector)?
            .get_attribute("data-page-id")
            .and_then(|raw| PageId::parse(&raw))
    }
}

impl BreadcrumbView for BrowserDocument {
    fn has_breadcrumb_wrapper(&self) -> bool {
        self.query(BREADCRUMB_WRAPPER).is_some()
    }

    fn crumb_labels(&self) -> Option<Vec<String>> {
        self.trail()?;
        Some(self.crumb_items().iter().map(text_of).collect())
    }

    fn fade_out_crumb(&self, index: usize) {
        if let Some(item) = self.crumb_items().get(index) {
            set_styles(item, &[("opacity", "0"), ("transform", "translateX(-10px)")]);
        }
    }

    fn truncate_crumbs(&self, len: usize) {
        for item in self.crumb_items().iter().skip(len) {
            item.remove();
        }
    }

    fn push_crumb(&self, item: &CrumbItem) {
        let Some(list) = self.crumb_list() else {
            return;
        };
        let Ok(li) = self.document.create_element("li") else {
            return;
        };
        li.set_class_name("docs-breadcrumbs__item");
        if let Some(inner) = self.crumb_inner(item) {
            li.append_child(&inner).ok();
        }
        set_styles(&li, &[("opacity", "0"), ("transform", "translateX(-10px)")]);
        list.append_child(&li).ok();
    }

    fn fade_in_crumb(&self, index: usize) {
        if let Some(item) = self.crumb_items().get(index) {
            // Force a reflow so the faded state is painted before the transition.
            if let Some(element) = item.dyn_ref::<HtmlElement>() {
                element.offset_height();
            }
            set_styles(item, &[("opacity", "1"), ("transform", "translateX(0)")]);
        }
    }

    fn set_crumb_current(&self, index: usize, item: &CrumbItem) {
        let Some(li) = self.crumb_items().into_iter().nth(index) else {
            return;
        };
        let is_current = li.query_selector(CRUMB_CURRENT).ok().flatten().is_some();
        if is_current == item.current {
            return;
        }
        if let Some(inner) = self.crumb_inner(item) {
            li.set_inner_html("");
            li.append_child(&inner).ok();
        }
    }

    fn insert_trail_html(&self, html: &str) {
        if let Some(wrapper) = self.query(BREADCRUMB_WRAPPER) {
            wrapper.insert_adjacent_html("afterbegin", html).ok();
        }
    }
}

impl TocView for BrowserDocument {
    fn has_toc_container(&self) -> bool {
        self.document.get_element_by_id(TOC_CONTAINER).is_some()
    }

    fn render_toc(&self, entries: &[TocEntry]) {
        let Some(container) = self.document.get_element_by_id(TOC_CONTAINER) else {
            return;
        };
        if entries.is_empty() {
            container.set_inner_html(NO_HEADINGS_HTML);
            return;
        }

        let mut html = String::from("<ul class=\"docs-toc__list\">");
        for entry in entries {
            html.push_str(&format!(
                "<li class=\"{}\"><a class=\"docs-toc__link\" href=\"{}\">{}</a></li>",
                entry.item_class(),
                escape_html(&entry.href()),
                escape_html(&entry.text)
            ));
        }
        html.push_str("</ul>");
        container.set_inner_html(&html);
    }

    fn is_link_active(&self, anchor: &str) -> bool {
        self.toc_link(anchor)
            .is_some_and(|link| link.class_list().contains("is-active"))
    }

    fn set_link_active(&self, anchor: &str, active: bool) {
        if let Some(link) = self.toc_link(anchor) {
            link.class_list().toggle_with_force("is-active", active).ok();
        }
    }
}

impl Viewport for BrowserDocument {
    fn metrics(&self) -> ScrollMetrics {
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or_default();
        let document_height = self
            .document
            .document_element()
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or_default();
        ScrollMetrics::new(self.scroll_y(), viewport_height, document_height)
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or_default()
    }

    fn element_box(&self, id: &str) -> Option<(f64, f64)> {
        let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
        Some((rect.top() + self.scroll_y(), rect.height()))
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

impl BrowserHistory for BrowserDocument {
    fn push_state(&self, state: &HistoryState, url: &str) {
        self.write_history(state, url, false);
    }

    fn replace_state(&self, state: &HistoryState, url: &str) {
        self.write_history(state, url, true);
    }

    fn replace_fragment(&self, anchor: &str) {
        let Ok(history) = self.window.history() else {
            return;
        };
        let state = history.state().unwrap_or(JsValue::NULL);
        history
            .replace_state_with_url(&state, "", Some(&format!("#{anchor}")))
            .ok();
    }

    fn current_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn current_path(&self) -> String {
        self.window
            .location()
            .pathname()
            .unwrap_or_else(|_| "/".to_string())
    }

    fn assign_location(&self, url: &str) {
        if let Err(err) = self.window.location().assign(url) {
            warn!("could not load {url}: {}", crate::error::describe(&err));
        }
    }
}
