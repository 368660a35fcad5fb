//! Router assembly and the HTTP listener.

use std::any::Any;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use snapstory_config::{ServerConfig, SnapStoryConfig};
use snapstory_understanding::{RecognitionService, build_service};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::cors::cors;
use crate::error::ApiError;
use crate::health::health;
use crate::upload::handle_upload;

/// Extra body allowance over the upload cap, so oversize photos reach the
/// handler's own size check.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

/// Application state shared across routes.
pub struct AppState {
    pub recognizer: RecognitionService,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(recognizer: RecognitionService, server: &ServerConfig) -> Self {
        Self {
            recognizer,
            allowed_origins: server.allowed_origins.clone(),
            max_upload_bytes: server.max_upload_bytes,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes + BODY_LIMIT_HEADROOM;

    Router::new()
        .route(
            "/",
            post(handle_upload).options(preflight).fallback(method_not_allowed),
        )
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Request handler panicked");
    ApiError::Internal.into_response()
}

/// Build the recognition service from `config` and serve until Ctrl-C.
pub async fn start_server(config: &SnapStoryConfig) -> Result<()> {
    let recognizer = build_service(&config.ai).context("Failed to build recognition service")?;
    let state = Arc::new(AppState::new(recognizer, &config.server));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        addr = %addr,
        origins = ?config.server.allowed_origins,
        max_upload_bytes = config.server.max_upload_bytes,
        "SnapStory gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
