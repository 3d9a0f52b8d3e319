//! Root self-description endpoint
//!
//! Reports which downstream base URLs the gateway resolved at startup, for
//! operator and debugging convenience.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use main_api_core::registry::ServiceKind;

use crate::http::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceInfo {
    service: &'static str,
    auth_service: String,
    image_service: String,
}

/// Root info router
pub fn create_info_router() -> Router<AppState> {
    Router::new().route("/", get(service_info))
}

/// GET / - static self-description
pub async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(ServiceInfo {
        service: "main-api",
        auth_service: state
            .registry
            .resolve(ServiceKind::Auth)
            .base_url
            .to_string(),
        image_service: state
            .registry
            .resolve(ServiceKind::Image)
            .base_url
            .to_string(),
    })
}
