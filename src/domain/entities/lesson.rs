//! Lesson entity: leaf level of the catalog.

use serde::{Deserialize, Serialize};

/// A single lesson inside a tutorial.
///
/// Lessons are leaves: they never have children of their own. Within a
/// tutorial they are ordered by [`Lesson::effective_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Estimated duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub completed: bool,
    pub tutorial_id: String,
}

impl Lesson {
    /// Creates an unordered, not yet completed lesson.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        tutorial_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order: None,
            duration_minutes: None,
            completed: false,
            tutorial_id: tutorial_id.into(),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Sort key within a tutorial. A missing order counts as 0.
    pub fn effective_order(&self) -> i32 {
        self.order.unwrap_or(0)
    }
}
