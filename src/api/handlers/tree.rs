//! Handlers for the catalog tree endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::tree::{NodeItem, RootLoadResponse, ToggleResponse, TreeResponse};
use crate::application::services::ToggleOutcome;
use crate::domain::level::{Level, NodeKey, NodeKeyError};
use crate::error::{AppError, map_root_error};
use crate::state::AppState;

fn node_key(level: &str, id: String) -> Result<NodeKey, AppError> {
    let level: Level = level.parse()?;
    if id.is_empty() {
        return Err(NodeKeyError::EmptyId.into());
    }
    Ok(NodeKey::new(level, id))
}

fn node_not_found(key: &NodeKey) -> AppError {
    AppError::not_found("Node is not in the catalog cache", json!({ "key": key.to_string() }))
}

/// Returns the whole cached tree with expansion state.
///
/// # Endpoint
///
/// `GET /api/tree`
///
/// `domains` is `null` until the root list has been loaded.
pub async fn tree_handler(State(state): State<AppState>) -> Json<TreeResponse> {
    let snapshot = state.view.snapshot().await;
    Json(TreeResponse::from(&snapshot))
}

/// Returns one cached node and its cached subtree.
///
/// # Endpoint
///
/// `GET /api/nodes/{level}/{id}`
///
/// # Errors
///
/// Returns 400 for an unknown level, 404 if the node is not cached.
pub async fn node_handler(
    State(state): State<AppState>,
    Path((level, id)): Path<(String, String)>,
) -> Result<Json<NodeItem>, AppError> {
    let key = node_key(&level, id)?;
    let snapshot = state.view.snapshot().await;

    let node = snapshot
        .tree
        .node(&key)
        .ok_or_else(|| node_not_found(&key))?;

    Ok(Json(NodeItem::build(node, &snapshot)))
}

/// Toggles a node open or closed, fetching its children on first open.
///
/// # Endpoint
///
/// `POST /api/nodes/{level}/{id}/toggle`
///
/// A failed fetch is not an HTTP error: the response carries
/// `"outcome": "failed"` and the node keeps an error marker until the next
/// toggle.
///
/// # Errors
///
/// Returns 400 for an unknown level, 404 if the node is not cached.
pub async fn toggle_handler(
    State(state): State<AppState>,
    Path((level, id)): Path<(String, String)>,
) -> Result<Json<ToggleResponse>, AppError> {
    let key = node_key(&level, id)?;
    let outcome = state.view.toggle(&key).await;
    respond(&state, &key, outcome).await
}

/// Opens a node without ever collapsing it.
///
/// # Endpoint
///
/// `POST /api/nodes/{level}/{id}/expand`
///
/// # Errors
///
/// Same as [`toggle_handler`].
pub async fn expand_handler(
    State(state): State<AppState>,
    Path((level, id)): Path<(String, String)>,
) -> Result<Json<ToggleResponse>, AppError> {
    let key = node_key(&level, id)?;
    let outcome = state.view.expand(&key).await;
    respond(&state, &key, outcome).await
}

async fn respond(
    state: &AppState,
    key: &NodeKey,
    outcome: ToggleOutcome,
) -> Result<Json<ToggleResponse>, AppError> {
    if outcome == ToggleOutcome::NotFound {
        return Err(node_not_found(key));
    }
    let node_state = state.view.node_state(key).await;
    let node_state = node_state.filter(|_| !key.level.is_leaf());

    Ok(Json(ToggleResponse::new(key, &outcome, node_state)))
}

/// Re-attempts the root load.
///
/// # Endpoint
///
/// `POST /api/retry`
///
/// # Errors
///
/// Returns 503 if the domain list still cannot be fetched.
pub async fn retry_handler(
    State(state): State<AppState>,
) -> Result<Json<RootLoadResponse>, AppError> {
    let load = state.view.retry().await.map_err(map_root_error)?;
    Ok(Json(load.into()))
}

/// Drops the whole cache and loads the catalog again.
///
/// # Endpoint
///
/// `POST /api/refresh`
///
/// # Errors
///
/// Returns 503 if the domain list cannot be fetched.
pub async fn refresh_handler(
    State(state): State<AppState>,
) -> Result<Json<RootLoadResponse>, AppError> {
    let load = state.view.refresh().await.map_err(map_root_error)?;
    Ok(Json(load.into()))
}

/// Collapses every node; cached children are kept.
///
/// # Endpoint
///
/// `POST /api/collapse`
pub async fn collapse_handler(State(state): State<AppState>) -> StatusCode {
    state.view.collapse_all().await;
    StatusCode::NO_CONTENT
}
