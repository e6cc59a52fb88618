//! Fetch gateway: the I/O boundary the tree is populated through.
//!
//! This module defines the [`CatalogGateway`] trait, one list query per
//! catalog level. The tree and its controller only ever talk to the data
//! source through this trait.
//!
//! # Architecture
//!
//! - Trait defines the contract for the four list queries
//! - Implementations live in `crate::infrastructure::gateway`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! Retries, backoff and timeouts are a gateway concern. The controller treats
//! every [`FetchError`] the same way regardless of its cause.

pub mod catalog_gateway;

pub use catalog_gateway::{CatalogGateway, FetchError, ListFilter};

#[cfg(test)]
pub use catalog_gateway::MockCatalogGateway;
