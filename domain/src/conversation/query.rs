//! Query value object

use serde::{Deserialize, Serialize};

/// A user query to forward to the agent (Value Object)
///
/// Only the empty string is rejected. Whitespace is passed through as-is,
/// since the agent decides what a blank utterance means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    content: String,
}

impl Query {
    /// Try to create a query, returning None if empty
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Build from an optional raw value, as received from a request body
    pub fn from_optional(content: Option<&str>) -> Option<Self> {
        content.and_then(Self::try_new)
    }

    /// Get the query content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_empty() {
        assert!(Query::try_new("").is_none());
    }

    #[test]
    fn test_whitespace_is_kept() {
        let q = Query::try_new("  ").unwrap();
        assert_eq!(q.content(), "  ");
    }

    #[test]
    fn test_from_optional() {
        assert!(Query::from_optional(None).is_none());
        assert!(Query::from_optional(Some("")).is_none());
        assert_eq!(
            Query::from_optional(Some("hello")).unwrap().content(),
            "hello"
        );
    }
}
