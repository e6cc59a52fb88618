//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::application::services::{RootState, ViewSnapshot};
use crate::state::AppState;

/// Returns service health status with catalog checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Catalog loaded, or a load is still pending
/// - **503 Service Unavailable**: The domain list could not be fetched
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "catalog": { "status": "ok", "message": "ready" },
///     "tree": { "status": "ok", "message": "42 nodes cached, generation 0" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let snapshot = state.view.snapshot().await;

    let catalog_check = check_catalog(&snapshot.root);
    let tree_check = check_tree(&snapshot);

    let healthy = catalog_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            catalog: catalog_check,
            tree: tree_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn check_catalog(root: &RootState) -> CheckStatus {
    match root {
        RootState::Failed { message } => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Domain list unavailable: {message}")),
        },
        RootState::Idle => CheckStatus {
            status: "ok".to_string(),
            message: Some("idle".to_string()),
        },
        RootState::Loading => CheckStatus {
            status: "ok".to_string(),
            message: Some("loading".to_string()),
        },
        RootState::Ready => CheckStatus {
            status: "ok".to_string(),
            message: Some("ready".to_string()),
        },
    }
}

fn check_tree(snapshot: &ViewSnapshot) -> CheckStatus {
    CheckStatus {
        status: "ok".to_string(),
        message: Some(format!(
            "{} nodes cached, generation {}",
            snapshot.tree.node_count(),
            snapshot.generation
        )),
    }
}
