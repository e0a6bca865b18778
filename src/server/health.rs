//! Health check endpoints.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Ping response.
#[derive(Debug, Clone, Serialize)]
pub struct PingResponse {
    message: &'static str,
}

/// Public health check endpoint.
///
/// Does not touch the extraction pipeline; suitable for load balancer probes.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong, api",
    })
}
