//! Fixture-backed catalog gateway.

use crate::domain::entities::{Domain, Lesson, Technology, Tutorial};
use crate::domain::gateway::{CatalogGateway, FetchError, ListFilter};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Flat catalog document: every level as a list, linked by parent ids.
///
/// ```json
/// {
///   "domains":      [{ "id": "d1", "name": "Web Development" }],
///   "technologies": [{ "id": "t1", "name": "HTML", "domain_id": "d1" }],
///   "tutorials":    [{ "id": "u1", "title": "Intro", "technology_id": "t1" }],
///   "lessons":      [{ "id": "l1", "title": "Tags", "order": 1, "tutorial_id": "u1" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub technologies: Vec<Technology>,
    #[serde(default)]
    pub tutorials: Vec<Tutorial>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Gateway answering the list queries from an in-memory [`CatalogFixture`].
///
/// Records are returned in fixture order, which plays the role of server
/// order. Queries for an unknown parent fail with [`FetchError::NotFound`].
///
/// # Use Cases
///
/// - Local development and demos without a catalog backend
/// - Integration tests of the view and the HTTP surface
pub struct InMemoryGateway {
    fixture: CatalogFixture,
    latency: Option<Duration>,
}

impl InMemoryGateway {
    pub fn new(fixture: CatalogFixture) -> Self {
        Self {
            fixture,
            latency: None,
        }
    }

    /// Loads the fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid fixture.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let fixture: CatalogFixture = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid catalog file {}", path.display()))?;

        debug!(
            path = %path.display(),
            domains = fixture.domains.len(),
            technologies = fixture.technologies.len(),
            tutorials = fixture.tutorials.len(),
            lessons = fixture.lessons.len(),
            "catalog fixture loaded"
        );
        Ok(Self::new(fixture))
    }

    /// Delays every response, to simulate a remote source.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl CatalogGateway for InMemoryGateway {
    async fn list_domains(&self, filter: &ListFilter) -> Result<Vec<Domain>, FetchError> {
        self.pause().await;
        Ok(self
            .fixture
            .domains
            .iter()
            .filter(|d| filter.matches(&d.name))
            .cloned()
            .collect())
    }

    async fn list_technologies(
        &self,
        domain_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Technology>, FetchError> {
        self.pause().await;
        if !self.fixture.domains.iter().any(|d| d.id == domain_id) {
            return Err(FetchError::NotFound(format!("domain {domain_id}")));
        }

        Ok(self
            .fixture
            .technologies
            .iter()
            .filter(|t| t.domain_id == domain_id && filter.matches(&t.name))
            .cloned()
            .collect())
    }

    async fn list_tutorials(
        &self,
        technology_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Tutorial>, FetchError> {
        self.pause().await;
        if !self.fixture.technologies.iter().any(|t| t.id == technology_id) {
            return Err(FetchError::NotFound(format!("technology {technology_id}")));
        }

        Ok(self
            .fixture
            .tutorials
            .iter()
            .filter(|u| u.technology_id == technology_id && filter.matches(&u.title))
            .cloned()
            .collect())
    }

    async fn list_lessons(
        &self,
        tutorial_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Lesson>, FetchError> {
        self.pause().await;
        if !self.fixture.tutorials.iter().any(|u| u.id == tutorial_id) {
            return Err(FetchError::NotFound(format!("tutorial {tutorial_id}")));
        }

        Ok(self
            .fixture
            .lessons
            .iter()
            .filter(|l| l.tutorial_id == tutorial_id && filter.matches(&l.title))
            .cloned()
            .collect())
    }
}
