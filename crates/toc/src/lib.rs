//! Table-of-contents engine for docs pages.
//!
//! - [`indexer`]: finds level 2-4 headings and gives each an anchor ([`slugify`])
//! - [`tracker`]: decides which heading is being read from the scroll position
//! - [`renderer`]: builds the TOC entries and keeps one link marked active
//! - [`session`]: [`TocSession`], the async driver wiring the three to scroll,
//!   resize and TOC-click events

pub mod indexer;
pub mod renderer;
pub mod session;
pub mod slug;
pub mod tracker;

pub use indexer::{anchor_for, duplicate_anchors, index_document, index_headings};
pub use renderer::{PAGE_TITLE_ANCHOR, TocRenderer};
pub use session::TocSession;
pub use slug::slugify;
pub use tracker::{ScrollConfig, ScrollTracker, active_heading};
