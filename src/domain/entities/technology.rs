//! Technology entity: second catalog level, owned by a [`super::Domain`].

use serde::{Deserialize, Serialize};

/// A technology inside a domain (e.g. "HTML" under "Web Development").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub domain_id: String,
}

impl Technology {
    /// Creates a technology belonging to `domain_id`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        domain_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            domain_id: domain_id.into(),
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}
