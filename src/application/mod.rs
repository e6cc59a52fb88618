//! Application layer: the catalog view that owns the tree.
//!
//! This layer orchestrates domain operations: it decides when a toggle needs
//! a gateway call, merges responses into the tree cache and walks the
//! default path on first load. HTTP handlers and the CLI only talk to
//! [`services::CatalogView`].
//!
//! # Available Services
//!
//! - [`services::catalog_view::CatalogView`] - Toggle, load, retry and refresh
//! - [`services::default_path`] - First-load branch selection

pub mod services;
