//! # Catalog Navigator
//!
//! A lazily populated navigation tree over a learning catalog, served over
//! HTTP with Axum.
//!
//! The catalog has four levels: domains, technologies, tutorials and
//! lessons. Only the domain list is fetched up front; every other level is
//! fetched the first time its parent is expanded and cached for the rest of
//! the session.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Records, the tree cache, expansion flags and the gateway trait
//! - **Application Layer** ([`application`]) - The catalog view and the default-path heuristic
//! - **Infrastructure Layer** ([`infrastructure`]) - Fixture-backed and retrying gateways
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - At most one fetch in flight per node; repeated toggles are ignored meanwhile
//! - Fetched children are never fetched again, even when the list was empty
//! - Failed fetches leave an error marker; the next toggle retries
//! - After the root load a default path (web domain, HTML, first tutorial) is opened
//! - Retries with exponential backoff and per-call timeouts
//!
//! ## Quick Start
//!
//! ```bash
//! export CATALOG_PATH="data/catalog.json"
//! cargo run
//!
//! curl localhost:3000/api/tree
//! curl -X POST localhost:3000/api/nodes/domain/d2/toggle
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        CatalogView, RootLoad, RootState, ToggleOutcome, ViewSnapshot,
    };
    pub use crate::domain::entities::{Domain, Lesson, Technology, Tutorial};
    pub use crate::domain::gateway::{CatalogGateway, FetchError, ListFilter};
    pub use crate::domain::level::{Level, NodeKey};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
