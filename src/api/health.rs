//! Health check handler

use axum::Json;
use serde::Serialize;

/// Version reported by the health check
pub const API_VERSION: &str = "1.0.0";

/// Message reported by the health check
pub const HEALTH_MESSAGE: &str = "Voice-Based Grocery List Builder API is running";

#[allow(missing_docs)]
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// GET / and GET /health - Report that the service is up
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: HEALTH_MESSAGE.to_string(),
        version: API_VERSION.to_string(),
    })
}
