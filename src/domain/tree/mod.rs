//! Lazily populated catalog tree.
//!
//! - [`children`] - the unfetched / fetched-empty / fetched-populated variant
//! - [`node`] - cached node types and borrowed [`NodeRef`] views
//! - [`cache`] - [`CatalogTree`] with its copy-on-write merge

pub mod cache;
pub mod children;
pub mod node;

pub use cache::{CatalogTree, ChildBatch, MergeOutcome};
pub use children::{Children, ChildrenState};
pub use node::{DomainNode, NodeRef, TechnologyNode, TutorialNode};
