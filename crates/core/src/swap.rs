//! The fade-out, replace, fade-in sequence of a content swap.

use crate::config::NavigationConfig;
use docs_nav_traits::{Clock, PageView, Region};
use docs_nav_types::PageContent;

const TITLE_SEPARATOR: &str = " – ";

/// `"{page title} – {site name}"`, where the site name is the last segment of the
/// current document title.
pub fn compose_document_title(current: &str, page_title: &str) -> String {
    let site = current.rsplit(TITLE_SEPARATOR).next().unwrap_or(current);
    format!("{page_title}{TITLE_SEPARATOR}{site}")
}

pub struct ContentSwap<'a, V: ?Sized, C> {
    view: &'a V,
    clock: &'a C,
    config: &'a NavigationConfig,
}

impl<'a, V: PageView + ?Sized, C: Clock> ContentSwap<'a, V, C> {
    pub fn new(view: &'a V, clock: &'a C, config: &'a NavigationConfig) -> Self {
        Self { view, clock, config }
    }

    /// Fades every present region out and waits for the transition to finish.
    pub async fn fade_out(&self) {
        for region in Region::ALL {
            if self.view.region_exists(region) {
                self.view.set_region_faded(region, true);
            }
        }
        self.clock.sleep(self.config.fade_duration()).await;
    }

    /// Writes the page into the document. Breadcrumbs are handled separately.
    pub fn apply(&self, page: &PageContent) {
        self.view.set_body_html(&page.body_with_children());
        self.view.set_title(&page.title);
        self.view.set_subtitle_html(page.subtitle_html().as_deref());
        self.view.set_badges_html(page.badges_html.as_deref());
        self.view
            .apply_sidebar(page.sidebar_layout(), page.sidebar_buttons_html.as_deref());

        let title = compose_document_title(&self.view.document_title(), &page.title);
        self.view.set_document_title(&title);
    }

    /// Lets the new content settle, then fades the regions back in. The right
    /// sidebar only comes back when the page shows one.
    pub async fn fade_in(&self, page: &PageContent) {
        self.clock.sleep(self.config.settle_delay()).await;
        let sidebar_visible = page.sidebar_layout().is_visible();
        for region in Region::ALL {
            if region == Region::RightSidebar && !sidebar_visible {
                continue;
            }
            if self.view.region_exists(region) {
                self.view.set_region_faded(region, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_nav_traits::{DomEvent, ImmediateClock, InMemoryDocument};
    use docs_nav_types::{PageId, SidebarLayout};
    use futures::executor::block_on;
    use std::time::Duration;

    fn page() -> PageContent {
        PageContent {
            id: PageId::from("42"),
            title: "Install".to_string(),
            subtitle: Some("Line one\nLine two".to_string()),
            body_html: "<h2>Requirements</h2>".to_string(),
            breadcrumb_trail: Vec::new(),
            breadcrumbs_html: None,
            badges_html: Some("<div class=\"docs-badges-wrapper\"></div>".to_string()),
            headings: Vec::new(),
            child_pages_html: Some("<div class=\"docs-child-pages\"></div>".to_string()),
            has_child_pages: true,
            show_toc: true,
            sidebar_buttons_html: None,
            url: None,
        }
    }

    #[test]
    fn test_document_title_keeps_site_name() {
        assert_eq!(compose_document_title("Setup – Guides – Acme Docs", "Install"), "Install – Acme Docs");
        assert_eq!(compose_document_title("Acme Docs", "Install"), "Install – Acme Docs");
    }

    #[test]
    fn test_full_swap_sequence() {
        let doc = InMemoryDocument::new();
        let clock = ImmediateClock::new();
        let config = NavigationConfig::default();
        let swap = ContentSwap::new(&doc, &clock, &config);
        let page = page();

        block_on(swap.fade_out());
        assert!(Region::ALL.iter().all(|r| doc.is_faded(*r)));
        swap.apply(&page);
        block_on(swap.fade_in(&page));

        assert_eq!(doc.body(), "<h2>Requirements</h2><div class=\"docs-child-pages\"></div>");
        assert_eq!(doc.subtitle().as_deref(), Some("Line one<br>Line two"));
        assert_eq!(doc.document_title(), "Install – Example Site");
        assert_eq!(doc.sidebar().map(|(layout, _)| layout), Some(SidebarLayout::Hidden));
        assert!(!doc.is_faded(Region::Content));
        // Child pages hide the sidebar, so it stays faded.
        assert!(doc.is_faded(Region::RightSidebar));
        assert_eq!(clock.sleeps(), [Duration::from_millis(200), Duration::from_millis(50)]);

        let body_at = doc.position_of(|e| *e == DomEvent::BodySet).unwrap();
        let last_fade_out = doc
            .position_of(|e| *e == DomEvent::RegionFaded(Region::RightSidebar, true))
            .unwrap();
        assert!(last_fade_out < body_at);
    }

    #[test]
    fn test_missing_regions_are_skipped() {
        let doc = InMemoryDocument::new()
            .without_region(Region::Subtitle)
            .without_region(Region::RightSidebar);
        let clock = ImmediateClock::new();
        let config = NavigationConfig::default();
        let swap = ContentSwap::new(&doc, &clock, &config);

        block_on(swap.fade_out());
        assert!(!doc.events().contains(&DomEvent::RegionFaded(Region::Subtitle, true)));

        let mut page = page();
        page.subtitle = None;
        swap.apply(&page);
        assert_eq!(doc.subtitle(), None);
    }
}
