use crate::tracker::ScrollConfig;
use docs_nav_traits::{TocView, Viewport};
use docs_nav_types::{HeadingDescriptor, TocEntry, TocLevel};

/// Anchor of the synthetic entry pointing at the top of the page.
pub const PAGE_TITLE_ANCHOR: &str = "page-title";

/// Builds TOC entries and keeps the single active link in sync with the view.
#[derive(Debug, Clone, Default)]
pub struct TocRenderer {
    entries: Vec<TocEntry>,
}

impl TocRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for a page: the page title first, then every heading in order.
    /// A page without headings has no entries at all.
    pub fn entries_for(page_title: &str, headings: &[HeadingDescriptor]) -> Vec<TocEntry> {
        if headings.is_empty() {
            return Vec::new();
        }
        let title = TocEntry {
            level: TocLevel::PageTitle,
            text: page_title.trim().to_string(),
            anchor_id: PAGE_TITLE_ANCHOR.to_string(),
        };
        std::iter::once(title)
            .chain(headings.iter().map(|heading| TocEntry {
                level: TocLevel::Heading(heading.level),
                text: heading.text.clone(),
                anchor_id: heading.anchor_id.clone(),
            }))
            .collect()
    }

    pub fn render<V: TocView + ?Sized>(&mut self, view: &V, page_title: &str, headings: &[HeadingDescriptor]) {
        self.entries = Self::entries_for(page_title, headings);
        view.render_toc(&self.entries);
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn contains(&self, anchor: &str) -> bool {
        self.entries.iter().any(|e| e.anchor_id == anchor)
    }

    /// Marks exactly the link for `anchor` active. Only links whose state differs
    /// are touched.
    pub fn set_active<V: TocView + ?Sized>(&self, view: &V, anchor: Option<&str>) {
        for entry in &self.entries {
            let wanted = anchor == Some(entry.anchor_id.as_str());
            if view.is_link_active(&entry.anchor_id) != wanted {
                view.set_link_active(&entry.anchor_id, wanted);
            }
        }
    }

    /// Scroll offset that brings `anchor` into view, leaving the configured gap
    /// above it. The page-title entry scrolls to the very top.
    pub fn scroll_target<V: Viewport + ?Sized>(view: &V, anchor: &str, config: &ScrollConfig) -> Option<f64> {
        if anchor == PAGE_TITLE_ANCHOR {
            return Some(0.0);
        }
        view.element_box(anchor)
            .map(|(top, _)| (top - config.heading_offset).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_nav_traits::{DomEvent, InMemoryDocument};
    use docs_nav_types::HeadingLevel;

    fn headings() -> Vec<HeadingDescriptor> {
        vec![
            HeadingDescriptor {
                level: HeadingLevel::H2,
                anchor_id: "setup".into(),
                text: "Setup".into(),
            },
            HeadingDescriptor {
                level: HeadingLevel::H3,
                anchor_id: "config".into(),
                text: "Config".into(),
            },
        ]
    }

    #[test]
    fn test_title_entry_comes_first() {
        let entries = TocRenderer::entries_for(" Install ", &headings());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].level, TocLevel::PageTitle);
        assert_eq!(entries[0].text, "Install");
        assert_eq!(entries[0].href(), "#page-title");
        assert_eq!(entries[2].item_class(), "docs-toc__item docs-toc__item--h3");
    }

    #[test]
    fn test_empty_headings_render_placeholder() {
        let doc = InMemoryDocument::new();
        let mut renderer = TocRenderer::new();
        renderer.render(&doc, "Install", &[]);
        assert!(renderer.entries().is_empty());
        assert_eq!(doc.events(), vec![DomEvent::TocRendered(0)]);
    }

    #[test]
    fn test_set_active_is_idempotent() {
        let doc = InMemoryDocument::new();
        let mut renderer = TocRenderer::new();
        renderer.render(&doc, "Install", &headings());
        doc.clear_events();

        renderer.set_active(&doc, Some("setup"));
        renderer.set_active(&doc, Some("setup"));
        assert_eq!(doc.events(), vec![DomEvent::TocLinkActive("setup".into(), true)]);

        renderer.set_active(&doc, Some("config"));
        assert_eq!(doc.active_links(), ["config"]);
        assert_eq!(doc.events().len(), 3);
    }

    #[test]
    fn test_scroll_target_leaves_offset() {
        let doc = InMemoryDocument::new();
        doc.set_element_box("setup", 1000.0, 40.0);
        doc.set_element_box("near-top", 30.0, 40.0);
        let config = ScrollConfig::default();
        assert_eq!(TocRenderer::scroll_target(&doc, "setup", &config), Some(920.0));
        assert_eq!(TocRenderer::scroll_target(&doc, "near-top", &config), Some(0.0));
        assert_eq!(TocRenderer::scroll_target(&doc, PAGE_TITLE_ANCHOR, &config), Some(0.0));
        assert_eq!(TocRenderer::scroll_target(&doc, "missing", &config), None);
    }
}
