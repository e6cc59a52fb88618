//! Domain entity: the top level of the catalog.

use serde::{Deserialize, Serialize};

/// A subject domain (e.g. "Web Development").
///
/// Domains are the root level of the catalog. Their technologies are fetched
/// lazily the first time the domain is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Domain {
    /// Creates a domain without icon or slug.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let domain = Domain::new("d1", "Web Development").with_icon("globe");
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            slug: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}
