//! Newtype wrapper for page identifiers.
//!
//! Page identifiers travel through three channels that disagree on their type:
//! the content endpoint emits them as JSON numbers, `data-page-id` attributes carry
//! them as strings, and history state round-trips whatever was stored. `PageId`
//! normalises all of them to their decimal string form.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a navigable page.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageId(Arc<str>);

impl PageId {
    /// Creates a new PageId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this page ID
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a raw attribute value, rejecting blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::new(trimmed))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPageId {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawPageId::deserialize(deserializer)? {
            RawPageId::Number(n) => PageId::from(n),
            RawPageId::Text(s) => PageId::from(s),
        })
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<u64> for PageId {
    fn from(n: u64) -> Self {
        Self(n.to_string().into())
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_are_equal() {
        let from_number: PageId = serde_json::from_str("42").unwrap();
        let from_string: PageId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "42");
    }

    #[test]
    fn test_serializes_as_string() {
        let id = PageId::from(7u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(PageId::parse("  "), None);
        assert_eq!(PageId::parse(" 12 "), Some(PageId::from("12")));
    }
}
