//! Catalog gateway implementations.
//!
//! Provides two [`crate::domain::gateway::CatalogGateway`] implementations:
//! - [`InMemoryGateway`] - Serves a catalog fixture loaded from JSON
//! - [`RetryingGateway`] - Adds retries with backoff and per-call timeouts to any gateway

mod in_memory;
mod retrying;

pub use in_memory::{CatalogFixture, InMemoryGateway};
pub use retrying::{RetryPolicy, RetryingGateway};
