//! Data Transfer Objects for API responses.
//!
//! All DTOs use Serde for JSON serialization. Tree DTOs are built from a
//! [`crate::application::services::ViewSnapshot`], never from the live view.

pub mod health;
pub mod tree;
