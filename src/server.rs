//! HTTP server initialization and runtime setup.
//!
//! Builds the gateway stack and the catalog view, starts the root load and
//! runs the Axum server until Ctrl+C.

use crate::application::services::CatalogView;
use crate::config::Config;
use crate::domain::gateway::CatalogGateway;
use crate::infrastructure::gateway::{InMemoryGateway, RetryingGateway};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the catalog view described by `config`.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or parsed.
pub fn build_view(config: &Config) -> Result<Arc<CatalogView>> {
    let source = InMemoryGateway::from_json_file(&config.catalog_path)?;
    let gateway: Arc<dyn CatalogGateway> =
        Arc::new(RetryingGateway::new(source, config.retry_policy()));

    let view = CatalogView::new(gateway).with_default_path(config.default_path_enabled);
    Ok(Arc::new(view))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Catalog gateway (fixture source behind retries and timeouts)
/// - Catalog view, with the root load started in the background
/// - Axum HTTP server
///
/// A failed root load does not stop the server: `/health` reports it and
/// `POST /api/retry` loads again.
///
/// # Errors
///
/// Returns an error if:
/// - The catalog file is missing or invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let view = build_view(&config)?;
    tracing::info!("Catalog source: {}", config.catalog_path.display());

    let loader = view.clone();
    tokio::spawn(async move {
        if let Err(e) = loader.load().await {
            tracing::warn!("Initial catalog load failed: {e}");
        }
    });

    let app = app_router(AppState::new(view));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
