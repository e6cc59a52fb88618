//! Catalog levels and per-node keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four catalog levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Domain,
    Technology,
    Tutorial,
    Lesson,
}

impl Level {
    /// Level of the records fetched when a node of this level is expanded.
    ///
    /// Returns `None` for [`Level::Lesson`], which is a leaf.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::Domain => Some(Level::Technology),
            Level::Technology => Some(Level::Tutorial),
            Level::Tutorial => Some(Level::Lesson),
            Level::Lesson => None,
        }
    }

    pub fn is_leaf(self) -> bool {
        self.child().is_none()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Domain => "domain",
            Level::Technology => "technology",
            Level::Tutorial => "tutorial",
            Level::Lesson => "lesson",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced when parsing a [`Level`] or [`NodeKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeKeyError {
    #[error("Unknown catalog level: {0}")]
    UnknownLevel(String),

    #[error("Node key must look like 'level:id', got '{0}'")]
    Malformed(String),

    #[error("Node id must not be empty")]
    EmptyId,
}

impl FromStr for Level {
    type Err = NodeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "domain" | "domains" => Ok(Level::Domain),
            "technology" | "technologies" => Ok(Level::Technology),
            "tutorial" | "tutorials" => Ok(Level::Tutorial),
            "lesson" | "lessons" => Ok(Level::Lesson),
            _ => Err(NodeKeyError::UnknownLevel(s.to_string())),
        }
    }
}

/// Identifies a node across the whole tree.
///
/// Ids are only unique within a level, so every per-node map is keyed by
/// the `(level, id)` pair. A domain and a lesson sharing the id `"1"` never
/// collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub level: Level,
    pub id: String,
}

impl NodeKey {
    pub fn new(level: Level, id: impl Into<String>) -> Self {
        Self {
            level,
            id: id.into(),
        }
    }

    pub fn domain(id: impl Into<String>) -> Self {
        Self::new(Level::Domain, id)
    }

    pub fn technology(id: impl Into<String>) -> Self {
        Self::new(Level::Technology, id)
    }

    pub fn tutorial(id: impl Into<String>) -> Self {
        Self::new(Level::Tutorial, id)
    }

    pub fn lesson(id: impl Into<String>) -> Self {
        Self::new(Level::Lesson, id)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level, self.id)
    }
}

impl FromStr for NodeKey {
    type Err = NodeKeyError;

    /// Parses keys of the form `level:id`, e.g. `technology:t1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (level, id) = s
            .split_once(':')
            .ok_or_else(|| NodeKeyError::Malformed(s.to_string()))?;

        if id.is_empty() {
            return Err(NodeKeyError::EmptyId);
        }

        Ok(Self::new(level.parse()?, id))
    }
}
