//! # docs-nav-core
//!
//! Platform-agnostic async navigation for documentation pages.
//!
//! This crate ties the page cache, the content swap and the breadcrumb
//! transitions into a [`NavigationSession`]:
//! - **links**: turns clicks and history events into [`NavigationRequest`]s
//! - **cache**: bounded FIFO cache of fetched pages
//! - **swap**: fade-out, replace, fade-in of the content regions
//! - **breadcrumbs**: trail diffing and staggered crumb transitions
//! - **session**: the navigation controller itself
//!
//! ## Design Principle
//!
//! Nothing here touches a browser API. The document, the clock and the content
//! endpoint are reached through the traits in `docs-nav-traits`, so the same
//! controller runs against `web-sys` in the browser and against the in-memory
//! document in tests.

pub use docs_nav_toc as toc;
pub use docs_nav_traits as traits;
pub use docs_nav_types as types;

pub mod breadcrumbs;
pub mod cache;
pub mod config;
pub mod error;
pub mod links;
pub mod session;
pub mod swap;

pub use breadcrumbs::{BreadcrumbAnimator, divergence_index};
pub use cache::{DEFAULT_CAPACITY, PageCache};
pub use config::NavigationConfig;
pub use error::NavigationError;
pub use links::{LinkClick, Modifiers, NavigationRequest, origin_of, parse_breadcrumbs, tag_content_links};
pub use session::{NavigationOutcome, NavigationSession};
pub use swap::{ContentSwap, compose_document_title};

pub use traits::{
    AbortHandle, Clock, ContentHooks, ContentSource, DocumentSurface, FetchError, ImmediateClock,
    InMemoryContentSource, InMemoryDocument, NoopHooks,
};
