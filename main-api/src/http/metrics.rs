//! Metrics exposition endpoint
//!
//! Pull-style scrape target for the metrics collector.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::http::AppState;

/// Metrics router
pub fn create_metrics_router() -> Router<AppState> {
    Router::new().route("/metrics", get(scrape))
}

/// GET /metrics - current snapshot in Prometheus text format
pub async fn scrape(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        state.metrics.render(),
    )
}
