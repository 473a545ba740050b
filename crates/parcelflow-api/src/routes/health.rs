//! Health check endpoint.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is responding.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Server time at the moment of the check.
    pub timestamp: DateTime<Utc>,
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "parcelflow-api",
        timestamp: Utc::now(),
    })
}
