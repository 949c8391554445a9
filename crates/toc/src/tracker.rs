//! Active-heading computation.
//!
//! [`active_heading`] is the pure decision function. [`ScrollTracker`] keeps the
//! layout snapshot it runs against, so scroll handling never queries element
//! geometry; snapshots are refreshed only on rebuild, resize and scroll settle.

use docs_nav_traits::Viewport;
use docs_nav_types::{HeadingPosition, ScrollMetrics};
use log::trace;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables of scroll tracking and TOC scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    /// Fraction of the viewport height added to `scroll_top` to get the activation point.
    pub activation_fraction: f64,
    pub top_threshold: f64,
    pub bottom_threshold: f64,
    pub resize_debounce_ms: u64,
    pub settle_debounce_ms: u64,
    /// How long tracking stays suppressed after a TOC click starts a smooth scroll.
    pub programmatic_scroll_ms: u64,
    /// Gap left above a heading when scrolling to it.
    pub heading_offset: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            activation_fraction: 0.15,
            top_threshold: 50.0,
            bottom_threshold: 50.0,
            resize_debounce_ms: 250,
            settle_debounce_ms: 500,
            programmatic_scroll_ms: 600,
            heading_offset: 80.0,
        }
    }
}

impl ScrollConfig {
    pub fn with_activation_fraction(mut self, fraction: f64) -> Self {
        self.activation_fraction = fraction;
        self
    }

    pub fn with_thresholds(mut self, top: f64, bottom: f64) -> Self {
        self.top_threshold = top;
        self.bottom_threshold = bottom;
        self
    }

    pub fn with_heading_offset(mut self, offset: f64) -> Self {
        self.heading_offset = offset;
        self
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn settle_debounce(&self) -> Duration {
        Duration::from_millis(self.settle_debounce_ms)
    }

    pub fn programmatic_scroll(&self) -> Duration {
        Duration::from_millis(self.programmatic_scroll_ms)
    }

    pub fn activation_point(&self, metrics: &ScrollMetrics) -> f64 {
        metrics.scroll_top + self.activation_fraction * metrics.viewport_height
    }
}

/// Picks the heading to mark active.
///
/// Rules, later ones overriding earlier ones:
/// 1. the last heading whose top is at or above the activation point, or the first
///    heading when none is;
/// 2. near the bottom of the document, the last heading at least partially visible;
/// 3. near the top of the document, the first heading.
///
/// Returns `None` only when there are no headings.
pub fn active_heading<'a>(
    positions: &'a [HeadingPosition],
    metrics: &ScrollMetrics,
    config: &ScrollConfig,
) -> Option<&'a HeadingPosition> {
    let first = positions.first()?;

    if metrics.is_near_top(config.top_threshold) {
        return Some(first);
    }

    if metrics.is_near_bottom(config.bottom_threshold)
        && let Some(visible) = positions.iter().rev().find(|p| p.is_visible_in(metrics))
    {
        return Some(visible);
    }

    let activation = config.activation_point(metrics);
    Some(
        positions
            .iter()
            .take_while(|p| p.top <= activation)
            .last()
            .unwrap_or(first),
    )
}

/// Heading layout snapshot plus the last computed active anchor.
#[derive(Debug, Clone, Default)]
pub struct ScrollTracker {
    config: ScrollConfig,
    anchors: Vec<String>,
    positions: Vec<HeadingPosition>,
    active: Option<String>,
}

impl ScrollTracker {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Replaces the tracked headings and snapshots their layout.
    pub fn track<V: Viewport + ?Sized>(&mut self, view: &V, anchors: Vec<String>) {
        self.anchors = anchors;
        self.active = None;
        self.refresh(view);
    }

    /// Re-measures every tracked heading. Headings missing from the layout are skipped.
    pub fn refresh<V: Viewport + ?Sized>(&mut self, view: &V) {
        self.positions = self
            .anchors
            .iter()
            .filter_map(|anchor| {
                view.element_box(anchor)
                    .map(|(top, height)| HeadingPosition::new(anchor.clone(), top, height))
            })
            .collect();
        trace!("snapshotted {} heading positions", self.positions.len());
    }

    /// Recomputes the active heading. Returns the new anchor when it changed.
    pub fn update(&mut self, metrics: &ScrollMetrics) -> Option<&str> {
        let next = active_heading(&self.positions, metrics, &self.config).map(|p| p.anchor_id.clone());
        if next == self.active {
            return None;
        }
        trace!("active heading {:?} -> {:?}", self.active, next);
        self.active = next;
        self.active.as_deref()
    }

    /// Overrides the active heading, e.g. for a clicked TOC link.
    pub fn set_active(&mut self, anchor: Option<String>) {
        self.active = anchor;
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn positions(&self) -> &[HeadingPosition] {
        &self.positions
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
        self.positions.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docs_nav_traits::InMemoryDocument;

    fn three_headings() -> Vec<HeadingPosition> {
        vec![
            HeadingPosition::new("intro", 0.0, 40.0),
            HeadingPosition::new("setup", 1000.0, 40.0),
            HeadingPosition::new("usage", 2000.0, 40.0),
        ]
    }

    fn active_at(scroll_top: f64, document_height: f64) -> Option<String> {
        let positions = three_headings();
        let metrics = ScrollMetrics::new(scroll_top, 800.0, document_height);
        active_heading(&positions, &metrics, &ScrollConfig::default()).map(|p| p.anchor_id.clone())
    }

    #[test]
    fn test_activation_point_boundary() {
        let metrics = ScrollMetrics::new(1050.0, 800.0, 5000.0);
        assert_eq!(ScrollConfig::default().activation_point(&metrics), 1170.0);
        assert_eq!(active_at(1050.0, 5000.0).as_deref(), Some("setup"));
        assert_eq!(active_at(1830.0, 5000.0).as_deref(), Some("setup"));
        assert_eq!(active_at(1880.0, 5000.0).as_deref(), Some("usage"));
    }

    #[test]
    fn test_top_override() {
        let positions = vec![
            HeadingPosition::new("late", 10.0, 40.0),
            HeadingPosition::new("early", 100.0, 40.0),
        ];
        // Activation point 20 + 120 = 140 would select "early".
        let metrics = ScrollMetrics::new(20.0, 800.0, 5000.0);
        let active = active_heading(&positions, &metrics, &ScrollConfig::default()).unwrap();
        assert_eq!(active.anchor_id, "late");
    }

    #[test]
    fn test_before_first_heading_selects_first() {
        let positions = vec![HeadingPosition::new("a", 900.0, 40.0)];
        let metrics = ScrollMetrics::new(100.0, 800.0, 5000.0);
        let active = active_heading(&positions, &metrics, &ScrollConfig::default()).unwrap();
        assert_eq!(active.anchor_id, "a");
    }

    #[test]
    fn test_bottom_prefers_last_visible_heading() {
        // Document ends at 2200: the final section is too short to reach the activation point.
        assert_eq!(active_at(1400.0, 2200.0).as_deref(), Some("usage"));
        assert_eq!(active_at(1300.0, 2200.0).as_deref(), Some("setup"));
    }

    #[test]
    fn test_no_headings() {
        let metrics = ScrollMetrics::new(100.0, 800.0, 5000.0);
        assert!(active_heading(&[], &metrics, &ScrollConfig::default()).is_none());
    }

    #[test]
    fn test_tracker_reports_changes_only() {
        let doc = InMemoryDocument::new();
        doc.set_element_box("intro", 0.0, 40.0);
        doc.set_element_box("setup", 1000.0, 40.0);

        let mut tracker = ScrollTracker::new(ScrollConfig::default());
        tracker.track(&doc, vec!["intro".into(), "setup".into(), "missing".into()]);
        assert_eq!(tracker.positions().len(), 2);

        let top = ScrollMetrics::new(0.0, 800.0, 5000.0);
        assert_eq!(tracker.update(&top), Some("intro"));
        assert_eq!(tracker.update(&top), None);

        let lower = ScrollMetrics::new(1000.0, 800.0, 5000.0);
        assert_eq!(tracker.update(&lower), Some("setup"));
        assert_eq!(tracker.active(), Some("setup"));
    }

    #[test]
    fn test_config_reads_camel_case_with_defaults() {
        let config: ScrollConfig =
            serde_json::from_str(r#"{"activationFraction":0.25,"headingOffset":100}"#).unwrap();
        assert_eq!(config.activation_fraction, 0.25);
        assert_eq!(config.heading_offset, 100.0);
        assert_eq!(config.settle_debounce(), Duration::from_millis(500));
    }
}
