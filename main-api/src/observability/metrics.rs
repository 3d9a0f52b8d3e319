//! Prometheus metrics for the gateway
//!
//! One request-duration histogram labeled by method, route and status code,
//! plus the process-level default collector. The registry is an owned value
//! injected into the middleware and the scrape handler rather than a
//! process-wide singleton, which keeps both testable in isolation.

use std::time::Instant;

use prometheus::{Encoder, HistogramOpts, HistogramVec, Registry, TextEncoder};

/// Histogram buckets in milliseconds. Fixed: the range resolves sub-10ms
/// health-check latencies and multi-second downstream timeouts in the same
/// histogram.
const DURATION_BUCKETS_MS: &[f64] = &[
    5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2000.0,
];

/// Request metrics recorder.
///
/// Cloning is cheap; clones share the same underlying registry.
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    request_duration_ms: HistogramVec,
}

impl HttpMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let request_duration_ms = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_ms",
                "Duration of HTTP requests in ms",
            )
            .buckets(DURATION_BUCKETS_MS.to_vec()),
            &["method", "route", "status_code"],
        )?;
        registry.register(Box::new(request_duration_ms.clone()))?;

        // Default process metrics (CPU, memory, fds)
        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            request_duration_ms,
        })
    }

    /// Start timing one request. Call `finish` on the returned timer once
    /// the response is complete.
    #[must_use]
    pub fn start_timer(&self, method: &str, route: &str) -> RequestTimer {
        RequestTimer {
            histogram: self.request_duration_ms.clone(),
            method: method.to_string(),
            route: route.to_string(),
            started: Instant::now(),
        }
    }

    /// Render every registered metric in Prometheus text format.
    ///
    /// Never fails the caller: an encoding error is logged and yields an
    /// empty snapshot.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!("Failed to encode metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_else(|e| {
            tracing::error!("Metrics snapshot is not valid UTF-8: {e}");
            String::new()
        })
    }
}

/// Timer for one in-flight request.
///
/// `finish` consumes the timer, so each request records at most one
/// observation; a timer that is never finished records nothing.
pub struct RequestTimer {
    histogram: HistogramVec,
    method: String,
    route: String,
    started: Instant,
}

impl RequestTimer {
    /// Record the elapsed duration with the final status code.
    pub fn finish(self, status_code: u16) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.histogram
            .with_label_values(&[
                self.method.as_str(),
                self.route.as_str(),
                status_code.to_string().as_str(),
            ])
            .observe(elapsed_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_count(metrics: &HttpMetrics, method: &str, route: &str, status: &str) -> u64 {
        metrics
            .request_duration_ms
            .with_label_values(&[method, route, status])
            .get_sample_count()
    }

    #[test]
    fn test_finished_timer_records_one_observation() {
        let metrics = HttpMetrics::new().expect("metrics build");

        let timer = metrics.start_timer("GET", "/health");
        timer.finish(200);

        assert_eq!(sample_count(&metrics, "GET", "/health", "200"), 1);
    }

    #[test]
    fn test_unfinished_timer_records_nothing() {
        let metrics = HttpMetrics::new().expect("metrics build");

        let timer = metrics.start_timer("GET", "/health");
        drop(timer);

        assert_eq!(sample_count(&metrics, "GET", "/health", "200"), 0);
    }

    #[test]
    fn test_clones_share_the_registry() {
        let metrics = HttpMetrics::new().expect("metrics build");
        let clone = metrics.clone();

        clone.start_timer("POST", "/auth/validate").finish(502);

        assert_eq!(sample_count(&metrics, "POST", "/auth/validate", "502"), 1);
    }

    #[test]
    fn test_render_exposes_histogram_with_labels() {
        let metrics = HttpMetrics::new().expect("metrics build");
        metrics.start_timer("GET", "/health").finish(200);

        let snapshot = metrics.render();
        assert!(snapshot.contains("# TYPE http_request_duration_ms histogram"));
        assert!(snapshot.contains(
            r#"http_request_duration_ms_count{method="GET",route="/health",status_code="200"} 1"#
        ));
        assert!(snapshot.contains(r#"le="5""#));
        assert!(snapshot.contains(r#"le="2000""#));
    }
}
