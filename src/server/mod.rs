//! HTTP job trigger
//!
//! Exposes the scrape pipeline as `POST /scrape`, guarded by a bearer
//! token. Authorization failures are surfaced as 401 responses and never
//! enter the pipeline's counts; pipeline failures map to 500.

use crate::cache::ProductCache;
use crate::config::Config;
use crate::model::{ScrapeRequest, StoreCounts};
use crate::notify::Notifier;
use crate::scraper::Pipeline;
use crate::storage::ProductStorage;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<dyn ProductCache>,
    pub storage: Arc<dyn ProductStorage>,
    pub notifier: Arc<dyn Notifier>,
}

/// JSON error body returned on auth and pipeline failures
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/scrape", post(scrape_handler))
        .with_state(state)
}

/// Binds the configured address and serves the API until shutdown
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = state.config.server.bind.parse()?;
    let app = build_router(state);

    tracing::info!("Job trigger listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn scrape_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<StoreCounts>, ApiError> {
    authenticate(&headers, &state.config.server.auth_token)?;

    tracing::info!(
        "Scraping initiated via API ({} pages requested)",
        request.total_pages
    );

    let pipeline = Pipeline::new(
        &state.config,
        state.cache.clone(),
        state.storage.clone(),
        state.notifier.clone(),
    )
    .map_err(|e| {
        tracing::error!("Failed to build pipeline: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let counts = pipeline.run(request.total_pages).await.map_err(|e| {
        tracing::error!("Scrape run failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(counts))
}

/// Checks the bearer credential; missing, malformed, and wrong tokens are
/// all rejected with 401.
fn authenticate(headers: &HeaderMap, expected_token: &str) -> Result<(), ApiError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::error!("Missing Authorization header");
            api_error(StatusCode::UNAUTHORIZED, "Unauthorized: missing token")
        })?;

    let token = authorization.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::error!("Malformed Authorization header");
        api_error(StatusCode::UNAUTHORIZED, "Unauthorized: invalid token format")
    })?;

    if token != expected_token {
        tracing::error!("Unauthorized access attempt");
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "Unauthorized: invalid token",
        ));
    }

    Ok(())
}
