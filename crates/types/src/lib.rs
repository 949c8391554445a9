pub mod document;
pub mod geometry;
pub mod heading;
pub mod ids;

pub use document::{Crumb, HistoryState, PageContent, SidebarLayout, TocEntry, TocLevel};
pub use geometry::{HeadingPosition, ScrollBehavior, ScrollMetrics};
pub use heading::{HeadingDescriptor, HeadingLevel, InvalidHeadingLevel, RawHeading};
pub use ids::PageId;
