//! Per-node expansion, loading and error flags.
//!
//! Visibility lives here, apart from the fetched data in
//! [`crate::domain::tree::CatalogTree`], so toggling a node never touches
//! cached children.
//!
//! # States
//!
//! The observable [`ExpansionState`] of a node is derived from its
//! [`NodeFlags`] and the [`ChildrenState`] of its cached children:
//!
//! ```text
//! collapsed ──toggle(unfetched)──▶ expanding ──ok──▶ expanded-(empty|populated)
//!     ▲                               │                  │        ▲
//!     └──────────────err──────────────┘             toggle│        │toggle
//!                                                         ▼        │
//!                                                 collapsed-after-expand
//! ```
//!
//! A toggle while `expanding` is ignored, which keeps at most one fetch in
//! flight per node. A failed fetch leaves an error marker and does not count
//! as fetched, so the next toggle fetches again.

use crate::domain::level::NodeKey;
use crate::domain::tree::ChildrenState;
use serde::Serialize;
use std::collections::HashMap;

/// Flags tracked per node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeFlags {
    pub expanded: bool,
    pub loading: bool,
    pub error: Option<String>,
    /// A user request arrived while a default-path fetch was in flight.
    #[serde(skip)]
    pub joined: bool,
}

/// Observable state of a node, for rendering toggle affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionState {
    Collapsed,
    Expanding,
    ExpandedEmpty,
    ExpandedPopulated,
    CollapsedAfterExpand,
}

impl ExpansionState {
    pub fn is_expanded(self) -> bool {
        matches!(
            self,
            ExpansionState::ExpandedEmpty | ExpansionState::ExpandedPopulated
        )
    }
}

/// What a toggle request should do, decided without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleDecision {
    /// Children were never fetched (or the last fetch failed): fetch them.
    Fetch,
    /// Children are cached: show them without any call.
    Show,
    /// Currently expanded: hide, keeping cached children.
    Hide,
    /// A fetch for this node is already in flight: do nothing.
    AlreadyLoading,
}

/// Expansion flags for every node the user (or the default path) touched.
#[derive(Debug, Clone, Default)]
pub struct ExpansionMap {
    flags: HashMap<NodeKey, NodeFlags>,
}

impl ExpansionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags of `key`; untouched nodes report the default (collapsed) flags.
    pub fn flags(&self, key: &NodeKey) -> NodeFlags {
        self.flags.get(key).cloned().unwrap_or_default()
    }

    #[cfg(test)]
    fn is_loading(&self, key: &NodeKey) -> bool {
        self.flags.get(key).is_some_and(|f| f.loading)
    }

    #[cfg(test)]
    fn is_expanded(&self, key: &NodeKey) -> bool {
        self.flags.get(key).is_some_and(|f| f.expanded)
    }

    pub fn error(&self, key: &NodeKey) -> Option<&str> {
        self.flags.get(key).and_then(|f| f.error.as_deref())
    }

    fn is_joined(&self, key: &NodeKey) -> bool {
        self.flags.get(key).is_some_and(|f| f.joined)
    }

    /// Decides what a toggle of `key` should do given its cached children.
    ///
    /// The loading flag is checked first.
    pub fn decide(&self, key: &NodeKey, children: ChildrenState) -> ToggleDecision {
        let flags = self.flags.get(key);

        if flags.is_some_and(|f| f.loading) {
            ToggleDecision::AlreadyLoading
        } else if flags.is_some_and(|f| f.expanded) {
            ToggleDecision::Hide
        } else if children.is_fetched() {
            ToggleDecision::Show
        } else {
            ToggleDecision::Fetch
        }
    }

    /// Marks a fetch as in flight: loading, expansion requested, error cleared.
    pub fn begin_fetch(&mut self, key: &NodeKey) {
        let flags = self.entry(key);
        flags.loading = true;
        flags.expanded = true;
        flags.error = None;
    }

    /// Records that a user asked for `key` while its fetch was in flight.
    ///
    /// Only matters for fetches started by the default path: if one fails,
    /// the user still gets an error marker.
    pub fn join_fetch(&mut self, key: &NodeKey) {
        let flags = self.entry(key);
        if flags.loading {
            flags.joined = true;
        }
    }

    /// Clears the loading flag after a successful merge.
    ///
    /// The expanded flag is left as is: if the node was collapsed while the
    /// fetch was in flight it stays collapsed.
    pub fn finish_fetch(&mut self, key: &NodeKey) {
        let flags = self.entry(key);
        flags.loading = false;
        flags.joined = false;
    }

    /// Records a failed fetch: collapsed, not loading, error marker set.
    pub fn fail_fetch(&mut self, key: &NodeKey, message: impl Into<String>) {
        let flags = self.entry(key);
        flags.loading = false;
        flags.joined = false;
        flags.expanded = false;
        flags.error = Some(message.into());
    }

    /// Drops an in-flight fetch without an error marker, unless a user
    /// joined it, in which case it fails like any user fetch.
    ///
    /// Used for requests the user never made, such as default-path steps.
    pub fn abandon_fetch(&mut self, key: &NodeKey, message: impl Into<String>) {
        if self.is_joined(key) {
            self.fail_fetch(key, message);
            return;
        }
        let flags = self.entry(key);
        flags.loading = false;
        flags.expanded = false;
    }

    pub fn show(&mut self, key: &NodeKey) {
        self.entry(key).expanded = true;
    }

    pub fn hide(&mut self, key: &NodeKey) {
        self.entry(key).expanded = false;
    }

    /// Collapses every node. Loading flags and error markers survive.
    pub fn collapse_all(&mut self) {
        for flags in self.flags.values_mut() {
            flags.expanded = false;
        }
    }

    /// Derives the observable state of `key`.
    pub fn state(&self, key: &NodeKey, children: ChildrenState) -> ExpansionState {
        let flags = self.flags.get(key);

        if flags.is_some_and(|f| f.loading) {
            return ExpansionState::Expanding;
        }

        let expanded = flags.is_some_and(|f| f.expanded);
        match (expanded, children) {
            (true, ChildrenState::Empty) => ExpansionState::ExpandedEmpty,
            (true, ChildrenState::Populated) => ExpansionState::ExpandedPopulated,
            (false, ChildrenState::Empty | ChildrenState::Populated) => {
                ExpansionState::CollapsedAfterExpand
            }
            (_, ChildrenState::Unfetched) => ExpansionState::Collapsed,
        }
    }

    fn entry(&mut self, key: &NodeKey) -> &mut NodeFlags {
        self.flags.entry(key.clone()).or_default()
    }
}
