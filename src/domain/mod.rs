//! Domain layer: catalog records, the gateway contract and the tree cache.
//!
//! Nothing in this layer performs I/O. The gateway is only a trait here;
//! concrete sources live in [`crate::infrastructure`].
//!
//! # Architecture
//!
//! - [`entities`] - Domain, Technology, Tutorial and Lesson records
//! - [`level`] - Catalog levels and `(level, id)` node keys
//! - [`gateway`] - Fetch gateway trait, one list query per level
//! - [`tree`] - Lazily populated tree with copy-on-write merges
//! - [`expansion`] - Expansion/loading/error flags and toggle decisions
//!
//! # Population Flow
//!
//! 1. A toggle consults [`expansion::ExpansionMap::decide`]
//! 2. On `Fetch`, the view calls the matching [`gateway::CatalogGateway`] query
//! 3. The response is merged via [`tree::CatalogTree::merge_children`]
//! 4. The loading flag is cleared (or the error marker set on failure)

pub mod entities;
pub mod expansion;
pub mod gateway;
pub mod level;
pub mod tree;
