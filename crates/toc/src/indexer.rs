//! Heading indexer: assigns anchors to content headings and lists them in order.

use crate::slug::slugify;
use docs_nav_traits::PageView;
use docs_nav_types::{HeadingDescriptor, RawHeading};
use log::debug;
use std::collections::HashMap;

/// Anchor a heading should carry: its own id, or the slug of its text.
///
/// Returns `None` when the heading has no id and its text slugifies to nothing.
pub fn anchor_for(heading: &RawHeading) -> Option<String> {
    match &heading.id {
        Some(id) if !id.is_empty() => Some(id.clone()),
        _ => Some(slugify(&heading.text)).filter(|slug| !slug.is_empty()),
    }
}

/// Descriptors for already-scanned headings, without touching any document.
pub fn index_headings(raw: &[RawHeading]) -> Vec<HeadingDescriptor> {
    raw.iter()
        .filter_map(|heading| {
            anchor_for(heading).map(|anchor_id| HeadingDescriptor {
                level: heading.level,
                anchor_id,
                text: heading.text.clone(),
            })
        })
        .collect()
}

/// Indexes the content region of a document, writing derived ids back to headings
/// that lack one. Identical headings get identical anchors.
pub fn index_document<V: PageView + ?Sized>(view: &V) -> Vec<HeadingDescriptor> {
    let raw = view.content_headings();
    let mut descriptors = Vec::with_capacity(raw.len());

    for (index, heading) in raw.iter().enumerate() {
        let Some(anchor_id) = anchor_for(heading) else {
            debug!("heading {:?} has no usable anchor, skipping", heading.text);
            continue;
        };
        if heading.id.as_deref() != Some(anchor_id.as_str()) {
            view.set_heading_id(index, &anchor_id);
        }
        descriptors.push(HeadingDescriptor {
            level: heading.level,
            anchor_id,
            text: heading.text.clone(),
        });
    }

    descriptors
}

/// Anchors used by more than one heading, in first-seen order.
pub fn duplicate_anchors(headings: &[HeadingDescriptor]) -> Vec<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for heading in headings {
        let count = counts.entry(heading.anchor_id.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(heading.anchor_id.as_str());
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_nav_traits::{DomEvent, InMemoryDocument};
    use docs_nav_types::HeadingLevel;

    #[test]
    fn test_assigns_missing_ids_in_document_order() {
        let doc = InMemoryDocument::new().with_body(
            r#"<h2>Getting Started</h2><p>x</p><h3 id="custom">Custom</h3><h4>API Reference!!</h4>"#,
        );
        let headings = index_document(&doc);

        let anchors: Vec<&str> = headings.iter().map(|h| h.anchor_id.as_str()).collect();
        assert_eq!(anchors, ["getting-started", "custom", "api-reference"]);
        assert_eq!(headings[2].level, HeadingLevel::H4);
        assert_eq!(
            doc.events(),
            vec![
                DomEvent::HeadingIdSet(0, "getting-started".to_string()),
                DomEvent::HeadingIdSet(2, "api-reference".to_string()),
            ]
        );
    }

    #[test]
    fn test_reindexing_is_stable() {
        let doc = InMemoryDocument::new().with_body("<h2>Setup</h2><h2>Usage</h2>");
        let first = index_document(&doc);
        doc.clear_events();
        let second = index_document(&doc);
        assert_eq!(first, second);
        assert!(doc.events().is_empty());
    }

    #[test]
    fn test_collisions_are_not_suffixed() {
        let doc = InMemoryDocument::new().with_body("<h2>Example</h2><h3>Example</h3><h2>!!!</h2>");
        let headings = index_document(&doc);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].anchor_id, headings[1].anchor_id);
        assert_eq!(duplicate_anchors(&headings), ["example"]);
    }
}
