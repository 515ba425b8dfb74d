// HTTP server
//
// `POST /api/generate` runs one orchestration per request; `GET /health`
// reports the configured provider.

mod handlers;

pub use handlers::{handle_generate, health_check, ApiError};

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::pipeline::RunCoordinator;

/// Headroom above the upload ceiling for the description field and
/// multipart framing, so oversized files reach the handler's own check.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

/// Shared state for all handlers
pub struct AppState {
    pub coordinator: RunCoordinator,
    pub max_upload_bytes: usize,
    pub provider: String,
    pub model: String,
}

impl AppState {
    pub fn new(coordinator: RunCoordinator, max_upload_bytes: usize) -> Self {
        let provider = coordinator.gateway().provider_name().to_string();
        let model = coordinator.gateway().model_name().to_string();
        Self {
            coordinator,
            max_upload_bytes,
            provider,
            model,
        }
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {o}"))
        })
        .collect::<Result<Vec<_>>>()?;

    // Wildcards are not allowed together with credentials, so methods and
    // headers mirror the preflight request instead.
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Build the router with CORS, body limit and request tracing
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Result<Router> {
    let body_limit = state.max_upload_bytes + BODY_LIMIT_HEADROOM;

    Ok(Router::new()
        .route("/api/generate", post(handle_generate))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Bind and serve until the process is stopped
pub async fn serve(config: &ServerConfig, coordinator: RunCoordinator) -> Result<()> {
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address))?;

    let state = Arc::new(AppState::new(coordinator, config.max_upload_bytes));
    let app = create_router(state, config)?;

    tracing::info!("Starting stackwright server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
