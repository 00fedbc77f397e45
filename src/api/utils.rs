//! API utility functions
//!
//! Helpers for turning raw request bodies into typed payloads.

use crate::error::AppError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse a JSON request body into a typed payload
///
/// The body must be a JSON object. Missing content type, malformed JSON and
/// non-object bodies all become [`AppError::InvalidPayload`].
///
/// # Arguments
/// * `body` - The extracted body, or the extractor's rejection
///
/// # Returns
/// * `Ok(T)` - The parsed payload
/// * `Err(AppError)` - The body is not a usable JSON object
pub fn parse_payload<T>(body: Result<Json<Value>, JsonRejection>) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let Json(value) = body.map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))?;

    if !value.is_object() {
        return Err(AppError::InvalidPayload(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AppError::InvalidPayload(e.to_string()))
}

/// Convert submitted items to the strings handed to the agent
///
/// Strings pass through unchanged; any other JSON value is rendered as its
/// JSON text.
pub fn item_names(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => name,
            other => other.to_string(),
        })
        .collect()
}
