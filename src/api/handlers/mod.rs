//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod tree;

pub use health::health_handler;
pub use tree::{
    collapse_handler, expand_handler, node_handler, refresh_handler, retry_handler,
    toggle_handler, tree_handler,
};
