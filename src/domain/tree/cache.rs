//! The partially populated catalog tree and its merge operation.

use super::children::{Children, ChildrenState};
use super::node::{DomainNode, NodeRef, TechnologyNode, TutorialNode, rebase};
use crate::domain::entities::{Domain, Lesson, Technology, Tutorial};
use crate::domain::level::{Level, NodeKey};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// One complete fetch response for the children of a single parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildBatch {
    Technologies(Vec<Technology>),
    Tutorials(Vec<Tutorial>),
    Lessons(Vec<Lesson>),
}

impl ChildBatch {
    /// Level of the records in this batch.
    pub fn level(&self) -> Level {
        match self {
            ChildBatch::Technologies(_) => Level::Technology,
            ChildBatch::Tutorials(_) => Level::Tutorial,
            ChildBatch::Lessons(_) => Level::Lesson,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ChildBatch::Technologies(items) => items.len(),
            ChildBatch::Tutorials(items) => items.len(),
            ChildBatch::Lessons(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of [`CatalogTree::merge_children`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The parent was found and its children replaced.
    Merged,
    /// No node with that key is currently in the tree. Nothing changed.
    NotFound,
    /// The batch does not hold children of the parent's level. Nothing changed.
    LevelMismatch,
}

/// In-memory catalog tree, populated one level at a time.
///
/// Every child list sits behind an [`Arc`]; merges copy only the lists on the
/// path from the root to the target node, so clones of the tree taken before
/// a merge stay valid and every untouched branch keeps pointing at the same
/// allocation.
///
/// The tree only grows within a session. Dropping it is the only way to
/// discard fetched data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogTree {
    domains: Children<DomainNode>,
}

impl CatalogTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domains(&self) -> &Children<DomainNode> {
        &self.domains
    }

    /// Installs the root domain list.
    ///
    /// Domains that were already present keep their fetched technologies.
    pub fn set_domains(&mut self, domains: Vec<Domain>) {
        let nodes = rebase(&self.domains, domains);
        debug!(count = nodes.len(), "merged domain list");
        self.domains = Children::fetched(nodes);
    }

    /// Replaces the children of the node identified by `parent`.
    ///
    /// `batch` must be the full response of one fetch. Only the target node's
    /// children change; children of the new list that were already cached
    /// under the same id keep their own fetched descendants, which makes
    /// repeated merges of one response idempotent. Lessons are sorted by
    /// [`Lesson::effective_order`] (stable) before they are stored.
    ///
    /// Unknown parents are a soft failure: the tree is left untouched and
    /// [`MergeOutcome::NotFound`] is returned.
    pub fn merge_children(&mut self, parent: &NodeKey, batch: ChildBatch) -> MergeOutcome {
        if parent.level.child() != Some(batch.level()) {
            return MergeOutcome::LevelMismatch;
        }

        let outcome = match batch {
            ChildBatch::Technologies(records) => self.merge_technologies(&parent.id, records),
            ChildBatch::Tutorials(records) => self.merge_tutorials(&parent.id, records),
            ChildBatch::Lessons(records) => self.merge_lessons(&parent.id, records),
        };

        debug!(parent = %parent, ?outcome, "merge children");
        outcome
    }

    fn merge_technologies(&mut self, domain_id: &str, records: Vec<Technology>) -> MergeOutcome {
        let Some(d) = self.locate_domain(domain_id) else {
            return MergeOutcome::NotFound;
        };
        let Some(domain) = items_mut(&mut self.domains).and_then(|domains| domains.get_mut(d))
        else {
            return MergeOutcome::NotFound;
        };

        domain.technologies = Children::fetched(rebase(&domain.technologies, records));
        MergeOutcome::Merged
    }

    fn merge_tutorials(&mut self, technology_id: &str, records: Vec<Tutorial>) -> MergeOutcome {
        let Some((d, t)) = self.locate_technology(technology_id) else {
            return MergeOutcome::NotFound;
        };
        let Some(technology) = items_mut(&mut self.domains)
            .and_then(|domains| domains.get_mut(d))
            .and_then(|domain| items_mut(&mut domain.technologies))
            .and_then(|technologies| technologies.get_mut(t))
        else {
            return MergeOutcome::NotFound;
        };

        technology.tutorials = Children::fetched(rebase(&technology.tutorials, records));
        MergeOutcome::Merged
    }

    fn merge_lessons(&mut self, tutorial_id: &str, mut records: Vec<Lesson>) -> MergeOutcome {
        let Some((d, t, u)) = self.locate_tutorial(tutorial_id) else {
            return MergeOutcome::NotFound;
        };
        let Some(tutorial) = items_mut(&mut self.domains)
            .and_then(|domains| domains.get_mut(d))
            .and_then(|domain| items_mut(&mut domain.technologies))
            .and_then(|technologies| technologies.get_mut(t))
            .and_then(|technology| items_mut(&mut technology.tutorials))
            .and_then(|tutorials| tutorials.get_mut(u))
        else {
            return MergeOutcome::NotFound;
        };

        // sort_by_key is stable: equal orders keep response order
        records.sort_by_key(Lesson::effective_order);
        tutorial.lessons = Children::fetched(records);
        MergeOutcome::Merged
    }

    /// Looks up a node anywhere in the tree.
    pub fn node(&self, key: &NodeKey) -> Option<NodeRef<'_>> {
        match key.level {
            Level::Domain => {
                let d = self.locate_domain(&key.id)?;
                Some(NodeRef::Domain(&self.domain_nodes()[d]))
            }
            Level::Technology => {
                let (d, t) = self.locate_technology(&key.id)?;
                Some(NodeRef::Technology(self.technology_at(d, t)?))
            }
            Level::Tutorial => {
                let (d, t, u) = self.locate_tutorial(&key.id)?;
                let tutorial = self.technology_at(d, t)?.tutorials.items()?.get(u)?;
                Some(NodeRef::Tutorial(tutorial))
            }
            Level::Lesson => self.tutorials().find_map(|tutorial| {
                tutorial
                    .lessons
                    .items()?
                    .iter()
                    .find(|lesson| lesson.id == key.id)
                    .map(NodeRef::Lesson)
            }),
        }
    }

    /// Children state of a node, or `None` if the node is not cached.
    pub fn children_state(&self, key: &NodeKey) -> Option<ChildrenState> {
        self.node(key).map(|node| node.children_state())
    }

    /// Number of cached children of a node; `0` while unfetched.
    pub fn child_count(&self, key: &NodeKey) -> Option<usize> {
        self.node(key).map(|node| node.child_count())
    }

    /// Number of cached nodes below the root, across all levels.
    pub fn node_count(&self) -> usize {
        let lessons: usize = self.tutorials().map(|t| t.lessons.len()).sum();
        self.domain_nodes().len()
            + self.technologies().count()
            + self.tutorials().count()
            + lessons
    }

    fn domain_nodes(&self) -> &[DomainNode] {
        self.domains.items().unwrap_or(&[])
    }

    fn technologies(&self) -> impl Iterator<Item = &TechnologyNode> {
        self.domain_nodes()
            .iter()
            .flat_map(|d| d.technologies.items().unwrap_or(&[]))
    }

    fn tutorials(&self) -> impl Iterator<Item = &TutorialNode> {
        self.technologies()
            .flat_map(|t| t.tutorials.items().unwrap_or(&[]))
    }

    fn technology_at(&self, d: usize, t: usize) -> Option<&TechnologyNode> {
        self.domain_nodes().get(d)?.technologies.items()?.get(t)
    }

    fn locate_domain(&self, id: &str) -> Option<usize> {
        self.domain_nodes().iter().position(|d| d.record.id == id)
    }

    fn locate_technology(&self, id: &str) -> Option<(usize, usize)> {
        self.domain_nodes().iter().enumerate().find_map(|(d, domain)| {
            let t = domain
                .technologies
                .items()?
                .iter()
                .position(|t| t.record.id == id)?;
            Some((d, t))
        })
    }

    fn locate_tutorial(&self, id: &str) -> Option<(usize, usize, usize)> {
        self.domain_nodes().iter().enumerate().find_map(|(d, domain)| {
            domain
                .technologies
                .items()?
                .iter()
                .enumerate()
                .find_map(|(t, technology)| {
                    let u = technology
                        .tutorials
                        .items()?
                        .iter()
                        .position(|u| u.record.id == id)?;
                    Some((d, t, u))
                })
        })
    }
}

/// Mutable access to a fetched list, cloning it first if a snapshot shares it.
fn items_mut<T: Clone>(children: &mut Children<T>) -> Option<&mut Vec<T>> {
    match children {
        Children::Fetched(items) => Some(Arc::make_mut(items)),
        Children::Unfetched => None,
    }
}
