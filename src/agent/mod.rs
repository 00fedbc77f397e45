//! Grocery agents
//!
//! The HTTP layer never organizes groceries itself; it forwards every request
//! to a [`GroceryAgent`]. Two agents ship with the service:
//!
//! - [`GeminiAgent`] asks the Gemini API for structured JSON.
//! - [`CatalogAgent`] works offline from a built-in keyword table and is used
//!   when no API key is configured.

pub mod api_client;
pub mod catalog;
pub mod gemini;
pub mod gemini_types;

pub use catalog::CatalogAgent;
pub use gemini::GeminiAgent;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by a grocery agent
#[derive(Error, Debug)]
pub enum AgentError {
    /// No API key was provided
    #[error("API key is empty")]
    MissingApiKey,

    /// The HTTP request could not be sent or its body could not be read
    #[error("Failed to reach Gemini API: {0}")]
    Transport(String),

    /// The API answered with HTTP 429
    #[error("Gemini API rate limit exceeded (HTTP {status}): {body}")]
    RateLimited {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the API
        body: String,
    },

    /// The API answered with a non-success status
    #[error("Gemini API returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the API
        body: String,
    },

    /// The API refused the prompt
    #[error("Gemini API blocked the prompt: {0}")]
    Blocked(String),

    /// The API answered, but without usable content
    #[error("Gemini API response {0}")]
    EmptyResponse(&'static str),

    /// The content could not be interpreted
    #[error("Invalid agent response: {0}")]
    InvalidResponse(String),
}

/// Delegate that owns the actual grocery logic
///
/// Implementations return JSON values; the HTTP layer wraps them verbatim
/// into the response envelope.
#[async_trait]
pub trait GroceryAgent: Send + Sync {
    /// Group grocery items by store category
    async fn organize_groceries(&self, items: &[String]) -> Result<Value, AgentError>;

    /// Suggest the groceries needed to cook a recipe
    async fn suggest_groceries_for_recipe(&self, recipe: &str) -> Result<Value, AgentError>;
}
