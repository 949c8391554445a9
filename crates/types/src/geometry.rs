use serde::{Deserialize, Serialize};

/// Vertical scroll state of the viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    /// Total scrollable height of the document.
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            document_height,
        }
    }

    /// Largest reachable `scroll_top`.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    pub fn viewport_bottom(&self) -> f64 {
        self.scroll_top + self.viewport_height
    }

    pub fn is_near_top(&self, threshold: f64) -> bool {
        self.scroll_top < threshold
    }

    pub fn is_near_bottom(&self, threshold: f64) -> bool {
        self.viewport_bottom() >= self.document_height - threshold
    }
}

/// Snapshot of a heading's absolute layout box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingPosition {
    pub anchor_id: String,
    pub top: f64,
    pub height: f64,
}

impl HeadingPosition {
    pub fn new(anchor_id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            anchor_id: anchor_id.into(),
            top,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// True when any part of the box lies inside the viewport.
    pub fn is_visible_in(&self, metrics: &ScrollMetrics) -> bool {
        self.top < metrics.viewport_bottom() && self.bottom() > metrics.scroll_top
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}
