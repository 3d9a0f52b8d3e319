// Module: observability
// Request metrics and the middleware that records them.

pub mod metrics;
pub mod metrics_middleware;

pub use metrics::{HttpMetrics, RequestTimer};
pub use metrics_middleware::track_requests;
