//! Error types for navigation operations.
//!
//! None of these are fatal to the page. A cancelled navigation is dropped silently,
//! a transport failure falls back to a full page load, and malformed breadcrumb
//! metadata downgrades to the diff-based breadcrumb animation.

use docs_nav_traits::FetchError;
use docs_nav_types::PageId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("navigation to page {0} was superseded")]
    Cancelled(PageId),
    #[error("transport failure: {0}")]
    Transport(FetchError),
    #[error("malformed breadcrumb metadata: {0}")]
    MalformedBreadcrumbs(#[from] serde_json::Error),
}

impl NavigationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NavigationError::Cancelled(_))
    }
}

impl From<FetchError> for NavigationError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Aborted(page) => NavigationError::Cancelled(page),
            other => NavigationError::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_maps_to_cancelled() {
        let err = NavigationError::from(FetchError::Aborted(PageId::from("4")));
        assert!(err.is_cancelled());

        let err = NavigationError::from(FetchError::Status {
            page: PageId::from("4"),
            status: 503,
        });
        assert!(matches!(err, NavigationError::Transport(_)));
        assert_eq!(err.to_string(), "transport failure: page 4 returned HTTP status 503");
    }
}
