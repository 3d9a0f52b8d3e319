// Module: http
// HTTP surface of the gateway: health probes, self-description, metrics
// exposition and the two forwarding routes.

pub mod health;
pub mod info;
pub mod metrics;
pub mod proxy;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use main_api_core::downstream::DownstreamClient;
use main_api_core::registry::ServiceRegistry;

use crate::observability::{track_requests, HttpMetrics};
use proxy::ProxyTarget;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub downstream: DownstreamClient,
    pub metrics: HttpMetrics,
    pub auth_proxy: Arc<ProxyTarget>,
    pub image_proxy: Arc<ProxyTarget>,
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Operator self-description
        .merge(info::create_info_router())
        // Health check endpoints (for monitoring probes)
        .merge(health::create_health_router())
        // Metrics exposition endpoint
        .merge(metrics::create_metrics_router())
        // Forwarding routes
        .merge(proxy::create_proxy_router());

    // `layer` wraps everything added so far, so the catch-panic layer added
    // first sits closest to the handlers and the request timer added last is
    // outermost. Every response, panic-converted 500s included, therefore
    // passes the timer exactly once.
    let router = router
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_requests,
        ));

    // Apply state to all routes (must be last)
    router.with_state(state)
}
