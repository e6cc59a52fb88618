//! Three-way child list state.

use serde::Serialize;
use std::sync::Arc;

/// Children of a node as held by the cache.
///
/// `Unfetched` means the children were never requested. `Fetched` holds the
/// complete list from one response, which may be empty. Keeping the two
/// apart stops a genuinely empty branch from being fetched again on every
/// expand.
///
/// The list is behind an [`Arc`] so snapshots and unrelated branches share
/// it; a merge replaces the `Arc` of one node only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum Children<T> {
    Unfetched,
    Fetched(Arc<Vec<T>>),
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Children::Unfetched
    }
}

impl<T> Children<T> {
    pub fn fetched(items: Vec<T>) -> Self {
        Children::Fetched(Arc::new(items))
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, Children::Fetched(_))
    }

    /// The fetched list, or `None` if never fetched.
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Children::Unfetched => None,
            Children::Fetched(items) => Some(items.as_slice()),
        }
    }

    pub fn len(&self) -> usize {
        self.items().map_or(0, <[T]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self) -> ChildrenState {
        match self {
            Children::Unfetched => ChildrenState::Unfetched,
            Children::Fetched(items) if items.is_empty() => ChildrenState::Empty,
            Children::Fetched(_) => ChildrenState::Populated,
        }
    }

    /// True if both sides point at the very same fetched list.
    pub fn shares_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Children::Fetched(a), Children::Fetched(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Data-side state of a node's children, without the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildrenState {
    Unfetched,
    Empty,
    Populated,
}

impl ChildrenState {
    pub fn is_fetched(self) -> bool {
        !matches!(self, ChildrenState::Unfetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_way_state() {
        let unfetched: Children<u8> = Children::default();
        let empty: Children<u8> = Children::fetched(vec![]);
        let populated = Children::fetched(vec![1u8, 2]);

        assert_eq!(unfetched.state(), ChildrenState::Unfetched);
        assert_eq!(empty.state(), ChildrenState::Empty);
        assert_eq!(populated.state(), ChildrenState::Populated);

        assert!(unfetched.items().is_none());
        assert_eq!(empty.items(), Some(&[][..]));
        assert_eq!(populated.len(), 2);
    }

    #[test]
    fn test_empty_fetch_is_not_unfetched() {
        let empty: Children<u8> = Children::fetched(vec![]);

        assert!(empty.is_fetched());
        assert!(empty.is_empty());
        assert_ne!(empty, Children::Unfetched);
    }

    #[test]
    fn test_shares_with() {
        let a = Children::fetched(vec![1u8]);
        let b = a.clone();
        let c = Children::fetched(vec![1u8]);

        assert!(a.shares_with(&b));
        assert!(!a.shares_with(&c));
        assert_eq!(a, c);
    }
}
