//! API route configuration.

use crate::api::handlers::{
    collapse_handler, expand_handler, node_handler, refresh_handler, retry_handler,
    toggle_handler, tree_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Catalog tree routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET  /tree`                       - Cached tree with expansion state
/// - `GET  /nodes/{level}/{id}`         - One cached node and its subtree
/// - `POST /nodes/{level}/{id}/toggle`  - Open or close a node
/// - `POST /nodes/{level}/{id}/expand`  - Open a node, never close it
/// - `POST /retry`                      - Retry a failed root load
/// - `POST /refresh`                    - Drop the cache and reload
/// - `POST /collapse`                   - Collapse every node
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/tree", get(tree_handler))
        .route("/nodes/{level}/{id}", get(node_handler))
        .route("/nodes/{level}/{id}/toggle", post(toggle_handler))
        .route("/nodes/{level}/{id}/expand", post(expand_handler))
        .route("/retry", post(retry_handler))
        .route("/refresh", post(refresh_handler))
        .route("/collapse", post(collapse_handler))
}
