//! Gateway trait for the four catalog list queries.

use crate::domain::entities::{Domain, Lesson, Technology, Tutorial};
use async_trait::async_trait;

/// Errors a gateway call may fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Catalog source unavailable: {0}")]
    Unavailable(String),

    #[error("Parent not found: {0}")]
    NotFound(String),

    #[error("Catalog request timed out")]
    Timeout,

    #[error("Invalid catalog response: {0}")]
    Invalid(String),
}

impl FetchError {
    /// Whether repeating the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Unavailable(_) | FetchError::Timeout)
    }
}

/// Optional filter parameters accepted by every list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring matched against the record's name or title.
    pub search: Option<String>,
}

impl ListFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    /// Returns true if `label` passes the filter.
    pub fn matches(&self, label: &str) -> bool {
        match &self.search {
            Some(term) => label.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}

/// Read-only data source for the catalog.
///
/// Each call returns the complete child list of one parent, in server order.
/// Calls are idempotent: issuing the same call twice is safe, although the
/// controller avoids doing so.
///
/// # Implementations
///
/// - [`crate::infrastructure::gateway::InMemoryGateway`] - fixture-backed source
/// - [`crate::infrastructure::gateway::RetryingGateway`] - retry/timeout decorator
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Lists all domains.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unavailable`] or [`FetchError::Timeout`] when the
    /// source cannot be reached.
    async fn list_domains(&self, filter: &ListFilter) -> Result<Vec<Domain>, FetchError>;

    /// Lists the technologies of a domain.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] if the domain is unknown to the source.
    async fn list_technologies(
        &self,
        domain_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Technology>, FetchError>;

    /// Lists the tutorials of a technology.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] if the technology is unknown to the source.
    async fn list_tutorials(
        &self,
        technology_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Tutorial>, FetchError>;

    /// Lists the lessons of a tutorial, unsorted.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] if the tutorial is unknown to the source.
    async fn list_lessons(
        &self,
        tutorial_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Lesson>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_case_insensitive() {
        let filter = ListFilter::search("html");

        assert!(filter.matches("HTML"));
        assert!(filter.matches("Intro to html5"));
        assert!(!filter.matches("CSS"));
        assert!(ListFilter::default().matches("anything"));
    }

    #[test]
    fn test_transient_errors() {
        assert!(FetchError::Timeout.is_transient());
        assert!(FetchError::Unavailable("down".into()).is_transient());
        assert!(!FetchError::NotFound("d9".into()).is_transient());
        assert!(!FetchError::Invalid("bad".into()).is_transient());
    }
}
