//! Error types and error handling for the application
//!
//! Every failure during request handling surfaces the same way: HTTP 500 with
//! a body of `{"error": "<message>"}`. Malformed input and agent failures are
//! deliberately not distinguished.

use crate::agent::AgentError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be read as the expected JSON object
    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    /// The grocery agent failed
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) | AppError::Agent(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
