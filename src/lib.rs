//! # docs-nav
//!
//! Async page navigation and table-of-contents tracking for documentation sites.
//!
//! The engine lives in the workspace crates and is re-exported here:
//! - **types**: wire and geometry types (`PageContent`, `PageId`, `HeadingDescriptor`, ...)
//! - **traits**: platform seams (`ContentSource`, `Clock`, the DOM contract) and
//!   their in-memory implementations
//! - **toc**: heading indexer, scroll tracker, TOC renderer and `TocSession`
//! - **core**: page cache, breadcrumb animator and `NavigationSession`
//!
//! This package adds the native side: [`HttpContentSource`] loads pages from a
//! running site with `reqwest`, and [`TokioClock`] drives transitions with tokio
//! timers. The `docs-nav` binary uses both to inspect payloads and endpoints.

pub use docs_nav_core as core;
pub use docs_nav_toc as toc;
pub use docs_nav_traits as traits;
pub use docs_nav_types as types;

pub mod clock;
pub mod http;

pub use clock::TokioClock;
pub use http::HttpContentSource;

pub use docs_nav_core::{
    LinkClick, NavigationConfig, NavigationError, NavigationOutcome, NavigationRequest,
    NavigationSession, PageCache,
};
pub use docs_nav_toc::{ScrollConfig, TocSession};
pub use docs_nav_traits::{
    AbortHandle, Clock, ContentHooks, ContentSource, FetchError, ImmediateClock,
    InMemoryContentSource, InMemoryDocument,
};
pub use docs_nav_types::{Crumb, HeadingDescriptor, PageContent, PageId};
