//! REST API for sizing requests.
//!
//! Provides two POST endpoints:
//! - `/api/simulate`: multipart load upload plus coordinates; fetches solar
//!   data and sizes the system
//! - `/api/size`: JSON load and solar series; runs the sizing core only

mod handlers;
pub mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::SizerConfig;
use crate::solar::SolarSource;

/// Largest accepted request body (uploaded load files included).
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across all request handlers.
///
/// Read-only after startup; each request sizes against its own data, so no
/// locks are needed.
pub struct AppState {
    /// Loaded configuration (default costs, search parameters).
    pub config: SizerConfig,
    /// Solar resource provider for `/api/simulate`.
    pub solar: Arc<dyn SolarSource>,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/simulate", post(handlers::simulate))
        .route("/api/size", post(handlers::size))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
