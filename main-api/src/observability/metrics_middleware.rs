//! Axum middleware for timing every request.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::metrics::HttpMetrics;

/// Start a timer when a request enters and record the observation with the
/// final status code once the response is produced.
///
/// Installed as the outermost layer so every route is counted, the metrics
/// and health endpoints included, and so responses synthesized by inner
/// layers (panic-converted 500s) are still observed.
pub async fn track_requests(
    State(metrics): State<HttpMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let timer = metrics.start_timer(request.method().as_str(), request.uri().path());

    let response = next.run(request).await;

    timer.finish(response.status().as_u16());
    response
}
