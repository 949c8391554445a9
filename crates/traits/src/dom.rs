//! The markup contract between the navigation engine and the rendered page.
//!
//! Every method is infallible. An implementation whose container is missing from
//! the page template does nothing (or reports "absent"), so a partially customised
//! template degrades step by step instead of aborting a navigation.

use docs_nav_types::{
    HistoryState, PageId, RawHeading, ScrollBehavior, ScrollMetrics, SidebarLayout, TocEntry,
};

/// Page regions that fade out and back in around a content swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Content,
    Title,
    Subtitle,
    RightSidebar,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Content,
        Region::Title,
        Region::Subtitle,
        Region::RightSidebar,
    ];
}

/// A breadcrumb segment to be inserted into the trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrumbItem {
    pub label: String,
    pub href: Option<String>,
    /// Current-page crumbs render as text with `aria-current="page"` instead of a link.
    pub current: bool,
}

/// Main column of the page: title, subtitle, body, badges, sidebar, overlay.
pub trait PageView {
    fn region_exists(&self, region: Region) -> bool;

    /// Moves a region to its faded (`opacity: 0`, shifted down) or shown state.
    fn set_region_faded(&self, region: Region, faded: bool);

    fn page_title(&self) -> String;

    /// Replaces the title text. The title element keeps (or gains) the `page-title` id.
    fn set_title(&self, text: &str);

    /// Updates the subtitle, creating the element after the title when missing.
    /// `None` hides an existing subtitle.
    fn set_subtitle_html(&self, html: Option<&str>);

    fn set_body_html(&self, html: &str);

    /// Replaces, inserts or removes the badge strip.
    fn set_badges_html(&self, html: Option<&str>);

    /// Creates, shows or hides the right sidebar and its TOC section.
    fn apply_sidebar(&self, layout: SidebarLayout, buttons_html: Option<&str>);

    fn document_title(&self) -> String;

    fn set_document_title(&self, title: &str);

    fn show_loading(&self, text: &str);

    /// Starts fading the loading overlay out. Returns false when no overlay exists.
    fn begin_hide_loading(&self) -> bool;

    fn remove_loading(&self);

    /// Page identifier of the sidebar entry marked as current, if any.
    fn current_page_id(&self) -> Option<PageId>;

    /// Moves the current-page marker in the sidebar tree, expanding its ancestors.
    fn mark_current_page(&self, id: &PageId);

    /// Level 2-4 headings of the content region, in document order.
    fn content_headings(&self) -> Vec<RawHeading>;

    fn set_heading_id(&self, index: usize, id: &str);

    /// `(index, href)` of content links without a page identifier.
    fn untagged_content_links(&self) -> Vec<(usize, String)>;

    fn tag_content_link(&self, index: usize, id: &PageId);

    /// Page identifier carried by any link on the page with exactly this `href`.
    fn page_id_for_href(&self, href: &str) -> Option<PageId>;
}

/// The breadcrumb trail (`.docs-breadcrumbs` inside `.docs-breadcrumbs-wrapper`).
pub trait BreadcrumbView {
    fn has_breadcrumb_wrapper(&self) -> bool;

    /// Trimmed labels of the rendered trail, or `None` if no trail is rendered.
    fn crumb_labels(&self) -> Option<Vec<String>>;

    fn fade_out_crumb(&self, index: usize);

    /// Removes every crumb at or after `len`.
    fn truncate_crumbs(&self, len: usize);

    /// Appends a crumb in its faded state, creating the trail container if needed.
    fn push_crumb(&self, item: &CrumbItem);

    fn fade_in_crumb(&self, index: usize);

    /// Re-renders a crumb as a link or as the current page to match `item.current`.
    /// No-op when the crumb is already rendered that way.
    fn set_crumb_current(&self, index: usize, item: &CrumbItem);

    /// Inserts a server-rendered trail at the start of the wrapper, without animation.
    fn insert_trail_html(&self, html: &str);
}

/// The table-of-contents container (`#table-of-contents`).
pub trait TocView {
    fn has_toc_container(&self) -> bool;

    /// Replaces the container's list. An empty slice renders the no-headings note.
    fn render_toc(&self, entries: &[TocEntry]);

    fn is_link_active(&self, anchor: &str) -> bool;

    fn set_link_active(&self, anchor: &str, active: bool);
}

pub trait Viewport {
    fn metrics(&self) -> ScrollMetrics;

    fn viewport_width(&self) -> f64;

    /// Absolute `(top, height)` of the element with this id.
    fn element_box(&self, id: &str) -> Option<(f64, f64)>;

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);
}

pub trait BrowserHistory {
    fn push_state(&self, state: &HistoryState, url: &str);

    fn replace_state(&self, state: &HistoryState, url: &str);

    /// Rewrites the URL fragment without adding a history entry.
    fn replace_fragment(&self, anchor: &str);

    fn current_url(&self) -> String;

    fn current_path(&self) -> String;

    /// Full browser navigation.
    fn assign_location(&self, url: &str);
}

/// Everything the navigation engine needs from a rendered document.
pub trait DocumentSurface: PageView + BreadcrumbView + TocView + Viewport + BrowserHistory {}

impl<T> DocumentSurface for T where T: PageView + BreadcrumbView + TocView + Viewport + BrowserHistory {}
