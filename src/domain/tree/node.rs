//! Cached node types for each catalog level.

use super::children::{Children, ChildrenState};
use crate::domain::entities::{Domain, Lesson, Technology, Tutorial};
use crate::domain::level::{Level, NodeKey};
use serde::Serialize;

/// A domain together with its (possibly unfetched) technologies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainNode {
    pub record: Domain,
    pub technologies: Children<TechnologyNode>,
}

/// A technology together with its (possibly unfetched) tutorials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyNode {
    pub record: Technology,
    pub tutorials: Children<TutorialNode>,
}

/// A tutorial together with its (possibly unfetched) lessons.
///
/// Fetched lessons are always sorted by [`Lesson::effective_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorialNode {
    pub record: Tutorial,
    pub lessons: Children<Lesson>,
}

/// A freshly fetched node that may inherit children from a previous copy.
pub(crate) trait Branch: Clone {
    type Record;

    fn from_record(record: Self::Record) -> Self;

    fn id(&self) -> &str;

    /// Takes over the already fetched children of `previous`.
    fn inherit(&mut self, previous: &Self);
}

impl Branch for DomainNode {
    type Record = Domain;

    fn from_record(record: Domain) -> Self {
        Self {
            record,
            technologies: Children::Unfetched,
        }
    }

    fn id(&self) -> &str {
        &self.record.id
    }

    fn inherit(&mut self, previous: &Self) {
        self.technologies = previous.technologies.clone();
    }
}

impl Branch for TechnologyNode {
    type Record = Technology;

    fn from_record(record: Technology) -> Self {
        Self {
            record,
            tutorials: Children::Unfetched,
        }
    }

    fn id(&self) -> &str {
        &self.record.id
    }

    fn inherit(&mut self, previous: &Self) {
        self.tutorials = previous.tutorials.clone();
    }
}

impl Branch for TutorialNode {
    type Record = Tutorial;

    fn from_record(record: Tutorial) -> Self {
        Self {
            record,
            lessons: Children::Unfetched,
        }
    }

    fn id(&self) -> &str {
        &self.record.id
    }

    fn inherit(&mut self, previous: &Self) {
        self.lessons = previous.lessons.clone();
    }
}

/// Builds nodes for `records`, keeping the fetched subtree of any node whose
/// id was already present in `previous`.
pub(crate) fn rebase<B: Branch>(previous: &Children<B>, records: Vec<B::Record>) -> Vec<B> {
    let previous = previous.items().unwrap_or(&[]);

    records
        .into_iter()
        .map(|record| {
            let mut node = B::from_record(record);
            if let Some(old) = previous.iter().find(|old| old.id() == node.id()) {
                node.inherit(old);
            }
            node
        })
        .collect()
}

/// Borrowed view of a node at any level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Domain(&'a DomainNode),
    Technology(&'a TechnologyNode),
    Tutorial(&'a TutorialNode),
    Lesson(&'a Lesson),
}

impl<'a> NodeRef<'a> {
    pub fn level(&self) -> Level {
        match self {
            NodeRef::Domain(_) => Level::Domain,
            NodeRef::Technology(_) => Level::Technology,
            NodeRef::Tutorial(_) => Level::Tutorial,
            NodeRef::Lesson(_) => Level::Lesson,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            NodeRef::Domain(n) => &n.record.id,
            NodeRef::Technology(n) => &n.record.id,
            NodeRef::Tutorial(n) => &n.record.id,
            NodeRef::Lesson(l) => &l.id,
        }
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.level(), self.id())
    }

    /// Display name for domains and technologies, title otherwise.
    pub fn label(&self) -> &'a str {
        match self {
            NodeRef::Domain(n) => &n.record.name,
            NodeRef::Technology(n) => &n.record.name,
            NodeRef::Tutorial(n) => &n.record.title,
            NodeRef::Lesson(l) => &l.title,
        }
    }

    /// State of this node's children. Lessons report `Empty`.
    pub fn children_state(&self) -> ChildrenState {
        match self {
            NodeRef::Domain(n) => n.technologies.state(),
            NodeRef::Technology(n) => n.tutorials.state(),
            NodeRef::Tutorial(n) => n.lessons.state(),
            NodeRef::Lesson(_) => ChildrenState::Empty,
        }
    }

    pub fn child_count(&self) -> usize {
        match self {
            NodeRef::Domain(n) => n.technologies.len(),
            NodeRef::Technology(n) => n.tutorials.len(),
            NodeRef::Tutorial(n) => n.lessons.len(),
            NodeRef::Lesson(_) => 0,
        }
    }

    /// Child nodes, or `None` when unfetched or a leaf.
    pub fn children(&self) -> Option<Vec<NodeRef<'a>>> {
        match self {
            NodeRef::Domain(n) => n
                .technologies
                .items()
                .map(|items| items.iter().map(NodeRef::Technology).collect()),
            NodeRef::Technology(n) => n
                .tutorials
                .items()
                .map(|items| items.iter().map(NodeRef::Tutorial).collect()),
            NodeRef::Tutorial(n) => n
                .lessons
                .items()
                .map(|items| items.iter().map(NodeRef::Lesson).collect()),
            NodeRef::Lesson(_) => None,
        }
    }
}
