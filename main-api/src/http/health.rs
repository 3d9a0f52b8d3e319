//! Health check endpoints
//!
//! Static liveness and readiness probes for the orchestration platform.
//! Readiness deliberately does not probe the downstream services: it only
//! says this process accepts connections. Downstream health is visible in
//! the proxy error rate instead.

use axum::{
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::http::AppState;

/// Health check router
pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
}

/// Basic health check (always returns 200 while the process is up)
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Liveness probe
pub async fn health_live() -> impl IntoResponse {
    Json(json!({ "status": "live" }))
}

/// Readiness probe
pub async fn health_ready() -> impl IntoResponse {
    Json(json!({ "status": "ready" }))
}
