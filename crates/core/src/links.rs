//! Turning browser events into navigation requests.

use crate::error::NavigationError;
use docs_nav_traits::PageView;
use docs_nav_types::{Crumb, HistoryState, PageId};
use log::{debug, warn};
use serde::Deserialize;
use url::{Origin, Url};

/// A request to show another page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub page_id: PageId,
    pub url: String,
    pub push_history: bool,
    /// Trail announced by the originating link, when it carried one.
    pub target_breadcrumbs: Option<Vec<Crumb>>,
}

impl NavigationRequest {
    pub fn new(page_id: impl Into<PageId>, url: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            url: url.into(),
            push_history: true,
            target_breadcrumbs: None,
        }
    }

    pub fn with_breadcrumbs(mut self, trail: Vec<Crumb>) -> Self {
        self.target_breadcrumbs = Some(trail);
        self
    }

    pub fn without_history(mut self) -> Self {
        self.push_history = false;
        self
    }

    /// Request for a `popstate` event. `None` when the entry was not created by
    /// the async layer, in which case the browser handles it.
    pub fn from_history(state: Option<&HistoryState>, url: &str) -> Option<Self> {
        state.map(|state| Self::new(state.page_id.clone(), url).without_history())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// A click on an anchor, reduced to what the navigation filter looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkClick {
    pub button: i16,
    pub modifiers: Modifiers,
    /// Absolute URL the link resolves to.
    pub href: String,
    pub page_id: Option<String>,
    /// Raw `data-breadcrumbs` attribute.
    pub breadcrumbs: Option<String>,
}

impl LinkClick {
    /// Primary button with no modifier held. Anything else asks the browser for
    /// a new tab, window or download.
    pub fn is_plain(&self) -> bool {
        self.button == 0 && !self.modifiers.any()
    }

    /// Decides whether this click becomes an async navigation.
    ///
    /// Only plain primary-button clicks on same-origin links carrying a page id
    /// qualify. Malformed breadcrumb metadata does not block the navigation; the
    /// trail is just treated as unknown.
    pub fn into_request(self, document_url: &str) -> Option<NavigationRequest> {
        if !self.is_plain() {
            return None;
        }
        let page_id = PageId::parse(self.page_id.as_deref()?)?;
        match (origin_of(&self.href), origin_of(document_url)) {
            (Some(link), Some(doc)) if link == doc => {}
            _ => {
                debug!("link to {} leaves the site, not intercepting", self.href);
                return None;
            }
        }

        let mut request = NavigationRequest::new(page_id, self.href);
        if let Some(raw) = self.breadcrumbs.as_deref() {
            match parse_breadcrumbs(raw) {
                Ok(trail) => request.target_breadcrumbs = Some(trail),
                Err(err) => warn!("{err}"),
            }
        }
        Some(request)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnouncedCrumb {
    Label(String),
    Full(Crumb),
}

/// Parses a `data-breadcrumbs` attribute: a JSON array of labels, or of
/// `{title, url}` objects.
pub fn parse_breadcrumbs(raw: &str) -> Result<Vec<Crumb>, NavigationError> {
    let crumbs: Vec<AnnouncedCrumb> = serde_json::from_str(raw)?;
    Ok(crumbs
        .into_iter()
        .map(|crumb| match crumb {
            AnnouncedCrumb::Label(title) => Crumb::new(title, None),
            AnnouncedCrumb::Full(crumb) => crumb,
        })
        .collect())
}

/// Origin of an absolute URL, or `None` for relative URLs and schemes without
/// a host such as `mailto:`.
pub fn origin_of(href: &str) -> Option<Origin> {
    let origin = Url::parse(href).ok()?.origin();
    origin.is_tuple().then_some(origin)
}

/// Page id of a link elsewhere on the page pointing at `href`: exact match first,
/// then without and with a trailing slash.
pub fn lookup_page_id<V: PageView + ?Sized>(view: &V, href: &str) -> Option<PageId> {
    let trimmed = href.strip_suffix('/').unwrap_or(href);
    view.page_id_for_href(href)
        .or_else(|| view.page_id_for_href(trimmed))
        .or_else(|| view.page_id_for_href(&format!("{trimmed}/")))
}

/// Gives content links without a page id the id of a matching known link, so
/// they navigate asynchronously too. Returns how many links were tagged.
pub fn tag_content_links<V: PageView + ?Sized>(view: &V) -> usize {
    let mut tagged = 0;
    for (index, href) in view.untagged_content_links() {
        if let Some(id) = lookup_page_id(view, &href) {
            view.tag_content_link(index, &id);
            tagged += 1;
        }
    }
    if tagged > 0 {
        debug!("tagged {tagged} content links with page ids");
    }
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_nav_traits::InMemoryDocument;

    const DOC: &str = "https://docs.example.com/guides/setup/";

    fn click(href: &str) -> LinkClick {
        LinkClick {
            href: href.to_string(),
            page_id: Some("42".to_string()),
            ..LinkClick::default()
        }
    }

    #[test]
    fn test_plain_same_origin_click_navigates() {
        let mut link = click("https://docs.example.com/guides/");
        link.breadcrumbs = Some(r#"["Home","Guides"]"#.to_string());
        let request = link.into_request(DOC).unwrap();
        assert_eq!(request.page_id, PageId::from("42"));
        assert!(request.push_history);
        assert_eq!(
            request.target_breadcrumbs,
            Some(vec![Crumb::new("Home", None), Crumb::new("Guides", None)])
        );
    }

    #[test]
    fn test_plain_click() {
        assert!(click("https://docs.example.com/a/").is_plain());

        let mut aux = click("https://docs.example.com/a/");
        aux.button = 2;
        assert!(!aux.is_plain());

        let setters: [fn(&mut Modifiers); 3] = [|m| m.meta = true, |m| m.shift = true, |m| m.alt = true];
        for set in setters {
            let mut modified = click("https://docs.example.com/a/");
            set(&mut modified.modifiers);
            assert!(!modified.is_plain());
        }
    }

    #[test]
    fn test_filtered_clicks() {
        let mut middle = click("https://docs.example.com/a/");
        middle.button = 1;
        assert!(middle.into_request(DOC).is_none());

        let mut ctrl = click("https://docs.example.com/a/");
        ctrl.modifiers.ctrl = true;
        assert!(ctrl.into_request(DOC).is_none());

        let mut untagged = click("https://docs.example.com/a/");
        untagged.page_id = Some("  ".to_string());
        assert!(untagged.into_request(DOC).is_none());

        assert!(click("https://other.example.com/a/").into_request(DOC).is_none());
        assert!(click("http://docs.example.com/a/").into_request(DOC).is_none());
    }

    #[test]
    fn test_malformed_breadcrumbs_still_navigate() {
        let mut link = click("https://docs.example.com/a/");
        link.breadcrumbs = Some("[Home,".to_string());
        let request = link.into_request(DOC).unwrap();
        assert_eq!(request.target_breadcrumbs, None);
        assert!(matches!(
            parse_breadcrumbs("[Home,"),
            Err(NavigationError::MalformedBreadcrumbs(_))
        ));
    }

    #[test]
    fn test_structured_breadcrumbs() {
        let trail = parse_breadcrumbs(r#"[{"title":"Home","url":"/"},"Install"]"#).unwrap();
        assert_eq!(trail[0].url.as_deref(), Some("/"));
        assert_eq!(trail[1], Crumb::new("Install", None));
    }

    #[test]
    fn test_origin_normalisation() {
        let serialized = |href: &str| origin_of(href).map(|o| o.ascii_serialization());
        assert_eq!(serialized("HTTPS://Docs.Example.com:443/x").as_deref(), Some("https://docs.example.com"));
        assert_eq!(serialized("https://docs.example.com:0443/a/").as_deref(), Some("https://docs.example.com"));
        assert_eq!(serialized("http://localhost:8080/").as_deref(), Some("http://localhost:8080"));
        assert_eq!(origin_of("/relative/path"), None);
        assert_eq!(origin_of("mailto:docs@example.com"), None);
    }

    #[test]
    fn test_default_port_spelling_is_same_origin() {
        let click = LinkClick {
            href: "https://docs.example.com:0443/guides/".to_string(),
            page_id: Some("7".to_string()),
            ..LinkClick::default()
        };
        assert!(click.into_request(DOC).is_some());
    }

    #[test]
    fn test_history_without_state_is_ignored() {
        assert!(NavigationRequest::from_history(None, DOC).is_none());
        let state = HistoryState::new(PageId::from("7"));
        let request = NavigationRequest::from_history(Some(&state), DOC).unwrap();
        assert!(!request.push_history);
        assert_eq!(request.url, DOC);
    }

    #[test]
    fn test_tags_links_by_trailing_slash_variants() {
        let doc = InMemoryDocument::new()
            .with_sidebar_link("/guides/", "7")
            .with_sidebar_link("/api", "9")
            .with_body(r#"<a href="/guides">G</a><a href="/api/">A</a><a href="/other/">O</a>"#);
        assert_eq!(tag_content_links(&doc), 2);
        let links = doc.content_links();
        assert_eq!(links[0].page_id, Some(PageId::from("7")));
        assert_eq!(links[1].page_id, Some(PageId::from("9")));
        assert_eq!(links[2].page_id, None);
    }
}
