//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub session_backend: &'static str,
    pub completion_backend: &'static str,
    pub version: &'static str,
}

/// `GET /health`: liveness probe for the transport adapter.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: crate::config::APP_SERVICE_NAME,
        session_backend: ctx.dispatcher.store_backend(),
        completion_backend: ctx.dispatcher.completion_backend(),
        version: crate::config::APP_VERSION,
    })
}
