//! Gemini API client
//!
//! Direct HTTP client for the Gemini `generateContent` endpoint.
//! The grocery agent uses it to get structured JSON responses.

use crate::agent::gemini_types::{
    GeminiApiRequest, GeminiApiResponse, GenerationConfig, RequestContent, RequestPart,
};
use crate::agent::AgentError;
use crate::config::AgentConfig;
use std::time::Duration;

/// Thin wrapper around a pooled `reqwest::Client` bound to one model
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for the given key, model and base URL
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from agent configuration
    ///
    /// The underlying HTTP client is built once, with the configured timeout.
    ///
    /// # Errors
    /// * `AgentError::MissingApiKey` if no API key is configured
    /// * `AgentError::Transport` if the HTTP client cannot be built
    pub fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or(AgentError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gemini_timeout_secs))
            .build()
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        Ok(Self::new(
            client,
            api_key,
            config.gemini_model.clone(),
            config.gemini_api_base_url.clone(),
        ))
    }

    /// Model this client talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Call Gemini with a prompt
    ///
    /// # Arguments
    /// * `prompt` - The prompt to send
    /// * `force_json` - If true, request the `application/json` response format
    ///
    /// # Returns
    /// * `Ok(String)` - The text content of the first candidate
    /// * `Err(AgentError)` - If the call failed or returned no usable content
    pub async fn generate(&self, prompt: &str, force_json: bool) -> Result<String, AgentError> {
        if self.api_key.is_empty() {
            return Err(AgentError::MissingApiKey);
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let generation_config = force_json.then(|| GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
        });

        let request_body = GeminiApiRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        };

        tracing::debug!(
            model = %self.model,
            force_json = force_json,
            prompt_len = prompt.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            if status_code == 429 {
                return Err(AgentError::RateLimited {
                    status: status_code,
                    body: error_body,
                });
            }

            return Err(AgentError::Status {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| AgentError::Transport(e.without_url().to_string()))?;

        let parsed: GeminiApiResponse = serde_json::from_str(&response_body).map_err(|e| {
            AgentError::InvalidResponse(format!(
                "Failed to parse JSON response from Gemini API: {} - Response body: {}",
                e, response_body
            ))
        })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(AgentError::Blocked(reason.clone()));
        }

        let candidate = parsed
            .candidates
            .first()
            .ok_or(AgentError::EmptyResponse("contains no candidates"))?;

        let part = candidate
            .content
            .parts
            .first()
            .ok_or(AgentError::EmptyResponse("candidate contains no parts"))?;

        if part.text.is_empty() {
            return Err(AgentError::EmptyResponse("text is empty"));
        }

        tracing::debug!(
            response_len = part.text.len(),
            "Successfully received response from Gemini API"
        );

        Ok(part.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn client_for(base_url: &str, api_key: &str) -> GeminiClient {
        GeminiClient::new(
            reqwest::Client::new(),
            api_key,
            "gemini-2.5-flash",
            base_url,
        )
    }

    fn key_query() -> Matcher {
        Matcher::AllOf(vec![Matcher::UrlEncoded(
            "key".into(),
            "test-key".into(),
        )])
    }

    #[tokio::test]
    async fn test_generate_empty_api_key() {
        let client = client_for("http://127.0.0.1:9", "");
        let result = client.generate("test prompt", false).await;
        assert!(matches!(result, Err(AgentError::MissingApiKey)));
    }

    #[test]
    fn test_from_config_requires_key() {
        let result = GeminiClient::from_config(&AgentConfig::default());
        assert!(matches!(result, Err(AgentError::MissingApiKey)));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(key_query())
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{"text": "This is a test response"}],
                            "role": "model"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate("test prompt", false).await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "This is a test response");
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_json_mode_sets_mime_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(key_query())
            .match_body(Matcher::PartialJsonString(
                r#"{"generationConfig": {"responseMimeType": "application/json"}}"#.to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"parts": [{"text": "{\"Dairy\": [\"milk\"]}"}]}}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate("test prompt", true).await;

        mock.assert_async().await;
        assert!(result.unwrap().contains("\"Dairy\""));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_empty_candidates() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(key_query())
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate("test prompt", false).await;

        mock.assert_async().await;
        assert!(result.unwrap_err().to_string().contains("no candidates"));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_blocked_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(key_query())
            .with_status(200)
            .with_body(r#"{"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate("test prompt", false).await;

        mock.assert_async().await;
        let error_msg = result.unwrap_err().to_string();
        assert!(
            error_msg.contains("blocked the prompt: SAFETY"),
            "Error message should mention the block reason, got: {}",
            error_msg
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_rate_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(key_query())
            .with_status(429)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate("test prompt", false).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(AgentError::RateLimited { status: 429, .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_server_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(key_query())
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate("test prompt", false).await;

        mock.assert_async().await;
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("503"));
        assert!(error_msg.contains("unavailable"));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(key_query())
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate("test prompt", false).await;

        mock.assert_async().await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse JSON"));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_empty_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(key_query())
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), "test-key");
        let result = client.generate("test prompt", false).await;

        mock.assert_async().await;
        assert!(result.unwrap_err().to_string().contains("text is empty"));
    }

    #[tokio::test]
    async fn test_generate_unreachable_host() {
        // Port 9 (discard) is not expected to be listening
        let client = client_for("http://127.0.0.1:9", "test-key");
        let result = client.generate("test prompt", false).await;
        assert!(matches!(result, Err(AgentError::Transport(_))));
    }
}
