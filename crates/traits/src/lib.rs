//! Platform abstraction traits for the docs navigation engine.
//!
//! The navigation and table-of-contents logic never touches a browser API directly.
//! Everything it needs from the outside world goes through the traits in this crate:
//!
//! - [`ContentSource`]: fetches page payloads, cancellable through an [`AbortHandle`]
//! - [`Clock`]: timed waits and paint-frame ticks used to sequence transitions
//! - [`dom`]: the markup contract (`PageView`, `BreadcrumbView`, `TocView`, `Viewport`,
//!   `BrowserHistory`)
//! - [`ContentHooks`]: optional feature modules re-initialised after a content swap
//!
//! In-memory implementations of each seam live next to the traits so that any
//! environment, tests included, can run the engine without a browser.

pub mod clock;
pub mod dom;
pub mod hooks;
pub mod markup;
pub mod memory;
pub mod source;

pub use clock::{Clock, ImmediateClock};
pub use dom::{
    BreadcrumbView, BrowserHistory, CrumbItem, DocumentSurface, PageView, Region, TocView,
    Viewport,
};
pub use hooks::{ContentHooks, NoopHooks};
pub use memory::{DomEvent, InMemoryDocument};
pub use source::{AbortHandle, ContentSource, FetchError, InMemoryContentSource};
