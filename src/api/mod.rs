//! REST API layer for HTTP request/response handling.
//!
//! Translates HTTP requests into [`crate::application::services::CatalogView`]
//! calls and formats the resulting snapshots.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
