//! Default-path heuristic: which branch opens on first load.
//!
//! The walk itself lives in [`super::CatalogView::load`]; this module only
//! holds the first-match-wins selectors and the report type. Matching is
//! literal: a case-insensitive substring for the domain, a
//! case-insensitive exact name for the technology, and the first tutorial in
//! server order.

use crate::domain::entities::{Domain, Technology, Tutorial};
use serde::Serialize;

const DOMAIN_HINTS: [&str; 2] = ["web", "development"];
const TECHNOLOGY_NAME: &str = "html";

/// First domain whose name contains "web" or "development".
pub fn pick_domain<'a, I>(domains: I) -> Option<&'a Domain>
where
    I: IntoIterator<Item = &'a Domain>,
{
    domains.into_iter().find(|domain| {
        let name = domain.name.to_lowercase();
        DOMAIN_HINTS.iter().any(|hint| name.contains(hint))
    })
}

/// First technology named exactly "html", ignoring case.
pub fn pick_technology<'a, I>(technologies: I) -> Option<&'a Technology>
where
    I: IntoIterator<Item = &'a Technology>,
{
    technologies
        .into_iter()
        .find(|technology| technology.name.to_lowercase() == TECHNOLOGY_NAME)
}

/// First tutorial in server order.
pub fn pick_tutorial<'a, I>(tutorials: I) -> Option<&'a Tutorial>
where
    I: IntoIterator<Item = &'a Tutorial>,
{
    tutorials.into_iter().next()
}

/// How far the default-path walk got.
///
/// Each field is set once the node was expanded and its children merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefaultPath {
    pub domain: Option<String>,
    pub technology: Option<String>,
    pub tutorial: Option<String>,
}

impl DefaultPath {
    /// Number of levels opened below the root (0..=3).
    pub fn depth(&self) -> usize {
        [&self.domain, &self.technology, &self.tutorial]
            .iter()
            .filter(|id| id.is_some())
            .count()
    }
}
