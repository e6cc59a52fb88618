//! Tutorial entity: third catalog level, owned by a [`super::Technology`].

use serde::{Deserialize, Serialize};

/// A tutorial inside a technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutorial {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub technology_id: String,
}

impl Tutorial {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        technology_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: None,
            technology_id: technology_id.into(),
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}
