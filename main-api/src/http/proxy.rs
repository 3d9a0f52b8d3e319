//! Forwarding routes
//!
//! Each forwarding route is one `ProxyTarget`: the downstream URL the
//! inbound body is POSTed to and the deadline for that call. A downstream
//! response is mirrored back verbatim, whatever its status; failing to
//! obtain a response at all becomes a 502 with a diagnostic body. Handlers
//! hold no state across invocations beyond the read-only target.

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use url::Url;

use main_api_core::downstream::{CallOutcome, DownstreamClient};
use main_api_core::registry::ServiceEndpoint;
use main_api_core::Result;

use crate::http::AppState;

/// Deadline for auth-service calls.
const AUTH_TIMEOUT: Duration = Duration::from_millis(3000);
/// Deadline for image-service calls.
const IMAGE_TIMEOUT: Duration = Duration::from_millis(5000);

/// One forwarding route: where the inbound body goes and how long the
/// downstream call may take.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    service: &'static str,
    url: Url,
    timeout: Duration,
}

impl ProxyTarget {
    pub fn new(endpoint: &ServiceEndpoint, path: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            service: endpoint.name,
            url: endpoint.join(path)?,
            timeout,
        })
    }

    /// POST /auth/validate -> {auth}/validate
    pub fn auth_validate(endpoint: &ServiceEndpoint) -> Result<Self> {
        Self::new(endpoint, "/validate", AUTH_TIMEOUT)
    }

    /// POST /images/upload -> {image}/upload
    pub fn image_upload(endpoint: &ServiceEndpoint) -> Result<Self> {
        Self::new(endpoint, "/upload", IMAGE_TIMEOUT)
    }
}

/// Forwarding router
pub fn create_proxy_router() -> Router<AppState> {
    Router::new()
        .route("/auth/validate", post(validate_token))
        .route("/images/upload", post(upload_image))
}

/// POST /auth/validate - validate a token via the auth service
pub async fn validate_token(State(state): State<AppState>, body: Bytes) -> Response {
    forward(&state.downstream, &state.auth_proxy, body).await
}

/// POST /images/upload - upload an image via the image service
pub async fn upload_image(State(state): State<AppState>, body: Bytes) -> Response {
    forward(&state.downstream, &state.image_proxy, body).await
}

async fn forward(client: &DownstreamClient, target: &ProxyTarget, body: Bytes) -> Response {
    let outcome = client
        .post_json(target.url.clone(), body, target.timeout)
        .await;
    into_response(target, outcome)
}

/// Body of the 502 produced when no downstream response was obtained.
#[derive(Debug, Serialize)]
struct UnavailableBody {
    error: String,
    details: String,
}

/// Map a downstream call outcome onto the gateway response.
fn into_response(target: &ProxyTarget, outcome: CallOutcome) -> Response {
    match outcome {
        CallOutcome::Response { status, body } => mirror(status, body),
        CallOutcome::TimedOut => unavailable(
            target,
            format!("request timed out after {}ms", target.timeout.as_millis()),
        ),
        CallOutcome::Failed(reason) => unavailable(target, reason),
    }
}

/// Mirror the downstream status and body back to the caller verbatim.
fn mirror(status: StatusCode, body: Bytes) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn unavailable(target: &ProxyTarget, details: String) -> Response {
    tracing::warn!(service = target.service, %details, "downstream call failed");

    let body = UnavailableBody {
        error: format!("{} unavailable", target.service),
        details,
    };
    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}
