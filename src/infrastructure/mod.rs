//! Infrastructure layer for external integrations.
//!
//! This layer implements the gateway contract defined by the domain layer.
//!
//! # Modules
//!
//! - [`gateway`] - Catalog sources (fixture-backed) and the retry decorator

pub mod gateway;
