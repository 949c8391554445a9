use crate::heading::{HeadingDescriptor, HeadingLevel};
use crate::ids::PageId;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// One segment of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub title: String,
    /// `None` for the current page, which is rendered without a link.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub url: Option<String>,
}

impl Crumb {
    pub fn new(title: impl Into<String>, url: Option<String>) -> Self {
        Self {
            title: title.into(),
            url,
        }
    }
}

/// Payload of the page-content endpoint for one navigable page.
///
/// Field names follow the endpoint's JSON. Empty strings are read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub id: PageId,
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub subtitle: Option<String>,
    #[serde(rename = "content", default)]
    pub body_html: String,
    #[serde(rename = "breadcrumbs", default)]
    pub breadcrumb_trail: Vec<Crumb>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub breadcrumbs_html: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub badges_html: Option<String>,
    #[serde(default)]
    pub headings: Vec<HeadingDescriptor>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub child_pages_html: Option<String>,
    #[serde(rename = "has_children", default)]
    pub has_child_pages: bool,
    #[serde(default)]
    pub show_toc: bool,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sidebar_buttons_html: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub url: Option<String>,
}

impl PageContent {
    /// Body HTML followed by the child-page cards, if any.
    pub fn body_with_children(&self) -> Cow<'_, str> {
        match &self.child_pages_html {
            Some(cards) => Cow::Owned(format!("{}{}", self.body_html, cards)),
            None => Cow::Borrowed(&self.body_html),
        }
    }

    /// Subtitle with line breaks rendered as `<br>`, matching server output.
    pub fn subtitle_html(&self) -> Option<String> {
        self.subtitle.as_ref().map(|s| s.replace('\n', "<br>"))
    }

    pub fn crumb_labels(&self) -> Vec<&str> {
        self.breadcrumb_trail.iter().map(|c| c.title.as_str()).collect()
    }

    pub fn sidebar_layout(&self) -> SidebarLayout {
        if self.has_child_pages {
            return SidebarLayout::Hidden;
        }
        let toc = self.show_toc && !self.headings.is_empty();
        let buttons = self
            .sidebar_buttons_html
            .as_deref()
            .is_some_and(|html| !html.trim().is_empty());
        if toc || buttons {
            SidebarLayout::Visible { toc, buttons }
        } else {
            SidebarLayout::Hidden
        }
    }
}

/// What the right-hand sidebar should contain for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarLayout {
    Hidden,
    Visible { toc: bool, buttons: bool },
}

impl SidebarLayout {
    pub fn is_visible(&self) -> bool {
        matches!(self, SidebarLayout::Visible { .. })
    }

    pub fn shows_toc(&self) -> bool {
        matches!(self, SidebarLayout::Visible { toc: true, .. })
    }
}

/// State attached to history entries pushed by the navigation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    #[serde(rename = "pageId")]
    pub page_id: PageId,
}

impl HistoryState {
    pub fn new(page_id: PageId) -> Self {
        Self { page_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocLevel {
    /// Synthetic entry pointing at the top of the page.
    PageTitle,
    Heading(HeadingLevel),
}

/// An entry in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: TocLevel,
    /// The text content of the heading.
    pub text: String,
    /// The anchor ID to link to this heading.
    pub anchor_id: String,
}

impl TocEntry {
    pub fn href(&self) -> String {
        format!("#{}", self.anchor_id)
    }

    /// Modifier class used by the markup, e.g. `docs-toc__item--h3`.
    pub fn item_class(&self) -> String {
        match self.level {
            TocLevel::PageTitle => "docs-toc__item docs-toc__item--title".to_string(),
            TocLevel::Heading(level) => format!("docs-toc__item docs-toc__item--{}", level.tag()),
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> &'static str {
        r#"{
            "id": 42,
            "title": "Install",
            "subtitle": "",
            "content": "<h2>Requirements</h2>",
            "breadcrumbs_html": "<nav class=\"docs-breadcrumbs\"></nav>",
            "badges_html": "",
            "headings": [{"level": 2, "id": "requirements", "text": "Requirements"}],
            "child_pages_html": "",
            "has_children": false,
            "show_toc": true,
            "sidebar_buttons_html": "",
            "url": "https://docs.example.com/guides/install/",
            "parent_id": 7
        }"#
    }

    #[test]
    fn test_parses_endpoint_payload() {
        let page: PageContent = serde_json::from_str(payload()).unwrap();
        assert_eq!(page.id, PageId::from("42"));
        assert_eq!(page.subtitle, None);
        assert_eq!(page.badges_html, None);
        assert!(page.breadcrumb_trail.is_empty());
        assert_eq!(page.headings.len(), 1);
        assert_eq!(
            page.sidebar_layout(),
            SidebarLayout::Visible {
                toc: true,
                buttons: false
            }
        );
    }

    #[test]
    fn test_child_pages_hide_sidebar() {
        let mut page: PageContent = serde_json::from_str(payload()).unwrap();
        page.has_child_pages = true;
        page.sidebar_buttons_html = Some("<div></div>".to_string());
        assert_eq!(page.sidebar_layout(), SidebarLayout::Hidden);
    }

    #[test]
    fn test_toc_requires_headings() {
        let mut page: PageContent = serde_json::from_str(payload()).unwrap();
        page.headings.clear();
        assert_eq!(page.sidebar_layout(), SidebarLayout::Hidden);

        page.sidebar_buttons_html = Some("<a class=\"sidebar-button\">Go</a>".to_string());
        assert_eq!(
            page.sidebar_layout(),
            SidebarLayout::Visible {
                toc: false,
                buttons: true
            }
        );
    }

    #[test]
    fn test_body_appends_child_cards_and_subtitle_breaks() {
        let mut page: PageContent = serde_json::from_str(payload()).unwrap();
        page.child_pages_html = Some("<div class=\"docs-child-pages\"></div>".to_string());
        page.subtitle = Some("first\nsecond".to_string());
        assert_eq!(
            page.body_with_children(),
            "<h2>Requirements</h2><div class=\"docs-child-pages\"></div>"
        );
        assert_eq!(page.subtitle_html().as_deref(), Some("first<br>second"));
    }

    #[test]
    fn test_history_state_uses_page_id_key() {
        let state = HistoryState::new(PageId::from("42"));
        assert_eq!(serde_json::to_string(&state).unwrap(), r#"{"pageId":"42"}"#);
        let back: HistoryState = serde_json::from_str(r#"{"pageId":42}"#).unwrap();
        assert_eq!(back, state);
    }
}
