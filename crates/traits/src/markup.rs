//! A forgiving scanner for the server-rendered HTML fragments.
//!
//! This is not an HTML parser. It understands exactly what the content endpoint
//! emits: heading elements with optional `id` attributes, anchors with `href` and
//! `data-page-id` attributes, and breadcrumb list items. Anything else is skipped.

use crate::dom::CrumbItem;
use docs_nav_types::{HeadingLevel, PageId, RawHeading};
use quick_xml::escape::{escape, resolve_html5_entity, unescape_with};

/// An anchor element found in a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLink {
    pub href: String,
    pub page_id: Option<PageId>,
}

/// Level 2-4 headings in document order.
pub fn scan_headings(html: &str) -> Vec<RawHeading> {
    let lower = html.to_ascii_lowercase();
    let mut headings = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = lower[cursor..].find("<h") {
        let start = cursor + offset;
        cursor = start + 2;

        let Some(level) = lower[cursor..]
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|d| HeadingLevel::try_from(d as u8).ok())
        else {
            continue;
        };
        let after_digit = cursor + 1;
        if !lower[after_digit..].starts_with(|c: char| c == '>' || c.is_ascii_whitespace()) {
            continue;
        }
        let Some(tag_end) = lower[after_digit..].find('>').map(|i| after_digit + i) else {
            break;
        };
        let close = format!("</{}>", level.tag());
        let Some(inner_end) = lower[tag_end + 1..].find(&close).map(|i| tag_end + 1 + i) else {
            break;
        };

        headings.push(RawHeading {
            level,
            id: attribute(&html[after_digit..tag_end], "id").filter(|id| !id.is_empty()),
            text: text_content(&html[tag_end + 1..inner_end]),
        });
        cursor = inner_end + close.len();
    }

    headings
}

/// Anchor elements in document order.
pub fn scan_links(html: &str) -> Vec<ScannedLink> {
    let lower = html.to_ascii_lowercase();
    let mut links = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = lower[cursor..].find("<a") {
        let start = cursor + offset + 2;
        cursor = start;
        if !lower[start..].starts_with(|c: char| c.is_ascii_whitespace()) {
            continue;
        }
        let Some(tag_end) = lower[start..].find('>').map(|i| start + i) else {
            break;
        };
        let attrs = &html[start..tag_end];
        if let Some(href) = attribute(attrs, "href") {
            links.push(ScannedLink {
                href,
                page_id: attribute(attrs, "data-page-id").and_then(|raw| PageId::parse(&raw)),
            });
        }
        cursor = tag_end + 1;
    }

    links
}

/// Items of a server-rendered breadcrumb trail (`li.docs-breadcrumbs__item`).
///
/// An item is current when it carries `aria-current` or has no link.
pub fn scan_crumbs(html: &str) -> Vec<CrumbItem> {
    let lower = html.to_ascii_lowercase();
    let mut crumbs = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = lower[cursor..].find("<li") {
        let start = cursor + offset + 3;
        cursor = start;
        let Some(tag_end) = lower[start..].find('>').map(|i| start + i) else {
            break;
        };
        let is_item = attribute(&html[start..tag_end], "class")
            .is_some_and(|class| class.split_whitespace().any(|c| c == "docs-breadcrumbs__item"));
        if !is_item {
            continue;
        }
        let inner_end = lower[tag_end..]
            .find("</li>")
            .map_or(html.len(), |i| tag_end + i);
        let inner = &html[tag_end + 1..inner_end];

        let href = scan_links(inner).into_iter().next().map(|link| link.href);
        let current = href.is_none() || inner.to_ascii_lowercase().contains("aria-current");
        crumbs.push(CrumbItem {
            label: text_content(inner),
            href: if current { None } else { href },
            current,
        });
        cursor = inner_end;
    }

    crumbs
}

/// Reads a quoted or bare attribute value out of a tag's attribute text.
pub fn attribute(attrs: &str, name: &str) -> Option<String> {
    let lower = attrs.to_ascii_lowercase();
    let mut search = 0;

    while let Some(offset) = lower[search..].find(name) {
        let at = search + offset;
        search = at + name.len();

        let preceded_ok = at == 0 || lower[..at].ends_with(|c: char| c.is_ascii_whitespace());
        let rest = lower[search..].trim_start();
        if !preceded_ok || !rest.starts_with('=') {
            continue;
        }

        let value_start = attrs.len() - rest.len() + 1;
        let value = attrs[value_start..].trim_start();
        let parsed = match value.chars().next() {
            Some(quote @ ('"' | '\'')) => value[1..].split(quote).next().unwrap_or_default(),
            Some(_) => value
                .split(|c: char| c.is_ascii_whitespace() || c == '/')
                .next()
                .unwrap_or_default(),
            None => "",
        };
        return Some(decode_entities(parsed));
    }

    None
}

/// Visible text of a fragment: tags dropped, entities decoded, whitespace collapsed.
pub fn text_content(html: &str) -> String {
    let mut raw = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => raw.push(c),
            _ => {}
        }
    }
    decode_entities(&raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes character references, HTML5 named entities included. Text with a stray
/// `&` that is not a reference is kept as written.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    match unescape_with(text, resolve_html5_entity) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Escapes text for inclusion in markup.
pub fn escape_html(text: &str) -> String {
    escape(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scans_indexed_headings_only() {
        let html = r#"<h1>Title</h1>
            <h2 id="setup" class="x">Setup <code>&amp;</code> run</h2>
            <p>text</p>
            <H3>Nested   <em>bits</em></H3>
            <h5>Too deep</h5>
            <h4 id=''>Empty id</h4>
            <header>not a heading</header>"#;
        let headings = scan_headings(html);
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].level, HeadingLevel::H2);
        assert_eq!(headings[0].id.as_deref(), Some("setup"));
        assert_eq!(headings[0].text, "Setup & run");
        assert_eq!(headings[1].level, HeadingLevel::H3);
        assert_eq!(headings[1].id, None);
        assert_eq!(headings[1].text, "Nested bits");
        assert_eq!(headings[2].id, None);
    }

    #[test]
    fn test_scans_links_with_page_ids() {
        let html = r#"<a href="/guides/" data-page-id="7">Guides</a>
            <abbr title="x">y</abbr>
            <a class="ext" href='https://example.com'>ext</a>
            <a name="anchor">no href</a>"#;
        let links = scan_links(html);
        assert_eq!(
            links,
            vec![
                ScannedLink {
                    href: "/guides/".to_string(),
                    page_id: Some(PageId::from("7")),
                },
                ScannedLink {
                    href: "https://example.com".to_string(),
                    page_id: None,
                },
            ]
        );
    }

    #[test]
    fn test_scans_breadcrumb_items() {
        let html = r#"<nav class="docs-breadcrumbs" aria-label="Breadcrumb">
            <ul class="docs-breadcrumbs__list">
              <li class="docs-breadcrumbs__item"><a class="docs-breadcrumbs__link" href="/">Home</a></li>
              <li class="docs-breadcrumbs__item"><a class="docs-breadcrumbs__link" href="/guides/">Guides</a></li>
              <li class="docs-breadcrumbs__item"><span class="docs-breadcrumbs__current" aria-current="page"> Install </span></li>
            </ul></nav>"#;
        let crumbs = scan_crumbs(html);
        let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Home", "Guides", "Install"]);
        assert_eq!(crumbs[1].href.as_deref(), Some("/guides/"));
        assert!(crumbs[2].current);
        assert!(!crumbs[0].current);
    }

    #[test]
    fn test_attribute_requires_whole_name() {
        assert_eq!(attribute(r#" data-id="a" id="b""#, "id").as_deref(), Some("b"));
        assert_eq!(attribute(" id=bare class=x", "id").as_deref(), Some("bare"));
        assert_eq!(attribute(r#" class="x""#, "id"), None);
    }

    #[test]
    fn test_crumb_labels_decode_character_references() {
        let html = r#"<li class="docs-breadcrumbs__item"><a href="/news/">News &amp; Events</a></li>
            <li class="docs-breadcrumbs__item"><span aria-current="page">What&#8217;s new &ndash; 2.0&#x21;</span></li>"#;
        let labels: Vec<String> = scan_crumbs(html).into_iter().map(|c| c.label).collect();
        assert_eq!(labels, ["News & Events", "What\u{2019}s new \u{2013} 2.0!"]);
    }

    #[test]
    fn test_stray_ampersand_is_kept() {
        assert_eq!(text_content("<b>Tom & Jerry</b>"), "Tom & Jerry");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
