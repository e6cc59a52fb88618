//! DTOs for the catalog tree and node toggles.

use serde::Serialize;

use crate::application::services::{
    DefaultPath, RootLoad, RootState, ToggleOutcome, ViewSnapshot,
};
use crate::domain::entities::{Domain, Lesson, Technology, Tutorial};
use crate::domain::expansion::ExpansionState;
use crate::domain::level::NodeKey;
use crate::domain::tree::NodeRef;

/// Record payload of a node, tagged with its level.
#[derive(Debug, Serialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum NodeRecord {
    Domain(Domain),
    Technology(Technology),
    Tutorial(Tutorial),
    Lesson(Lesson),
}

/// One rendered node with its toggle affordance.
///
/// `children` is present as soon as the children were fetched, even while
/// the node is collapsed; the client decides visibility from `state`.
/// Lessons are leaves and carry no `state`.
#[derive(Debug, Serialize)]
pub struct NodeItem {
    pub key: String,
    #[serde(flatten)]
    pub record: NodeRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ExpansionState>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeItem>>,
}

impl NodeItem {
    pub fn build(node: NodeRef<'_>, snapshot: &ViewSnapshot) -> Self {
        let key = node.key();
        let flags = snapshot.flags(&key);

        let record = match node {
            NodeRef::Domain(n) => NodeRecord::Domain(n.record.clone()),
            NodeRef::Technology(n) => NodeRecord::Technology(n.record.clone()),
            NodeRef::Tutorial(n) => NodeRecord::Tutorial(n.record.clone()),
            NodeRef::Lesson(l) => NodeRecord::Lesson(l.clone()),
        };
        let state = (!key.level.is_leaf())
            .then(|| snapshot.expansion.state(&key, node.children_state()));
        let children = node.children().map(|children| {
            children
                .into_iter()
                .map(|child| NodeItem::build(child, snapshot))
                .collect()
        });

        Self {
            key: key.to_string(),
            record,
            state,
            loading: flags.loading,
            error: flags.error,
            children,
        }
    }
}

/// Full tree snapshot.
#[derive(Debug, Serialize)]
pub struct TreeResponse {
    pub generation: u64,
    pub root: RootState,
    /// `None` until the domain list has been fetched.
    pub domains: Option<Vec<NodeItem>>,
}

impl From<&ViewSnapshot> for TreeResponse {
    fn from(snapshot: &ViewSnapshot) -> Self {
        let domains = snapshot.tree.domains().items().map(|domains| {
            domains
                .iter()
                .map(|domain| NodeItem::build(NodeRef::Domain(domain), snapshot))
                .collect()
        });

        Self {
            generation: snapshot.generation,
            root: snapshot.root.clone(),
            domains,
        }
    }
}

/// Result of a toggle request.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub key: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ExpansionState>,
}

impl ToggleResponse {
    pub fn new(key: &NodeKey, outcome: &ToggleOutcome, state: Option<ExpansionState>) -> Self {
        let count = match outcome {
            ToggleOutcome::Fetched { count } | ToggleOutcome::Shown { count } => Some(*count),
            _ => None,
        };
        let error = match outcome {
            ToggleOutcome::Failed(e) => Some(e.to_string()),
            _ => None,
        };

        Self {
            key: key.to_string(),
            outcome: outcome.as_str(),
            count,
            error,
            state,
        }
    }
}

/// Result of a root load, retry or refresh.
#[derive(Debug, Serialize)]
pub struct RootLoadResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_path: Option<DefaultPath>,
}

impl From<RootLoad> for RootLoadResponse {
    fn from(load: RootLoad) -> Self {
        match load {
            RootLoad::Loaded {
                domains,
                default_path,
            } => Self {
                outcome: "loaded",
                domains: Some(domains),
                default_path: Some(default_path),
            },
            RootLoad::AlreadyLoaded => Self::bare("already_loaded"),
            RootLoad::InProgress => Self::bare("in_progress"),
            RootLoad::Superseded => Self::bare("superseded"),
        }
    }
}

impl RootLoadResponse {
    fn bare(outcome: &'static str) -> Self {
        Self {
            outcome,
            domains: None,
            default_path: None,
        }
    }
}
