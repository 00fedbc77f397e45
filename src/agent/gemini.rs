//! Gemini-backed grocery agent
//!
//! Builds a prompt per operation, asks Gemini for JSON output and checks
//! that the answer has the shape the frontend expects.

use crate::agent::api_client::GeminiClient;
use crate::agent::{AgentError, GroceryAgent};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Grocery agent that delegates to the Gemini API
#[derive(Clone)]
pub struct GeminiAgent {
    client: GeminiClient,
}

impl GeminiAgent {
    /// Create an agent on top of a configured client
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    async fn generate_json(&self, prompt: &str) -> Result<Value, AgentError> {
        let text = self.client.generate(prompt, true).await?;
        parse_model_json(&text)
    }
}

#[async_trait]
impl GroceryAgent for GeminiAgent {
    async fn organize_groceries(&self, items: &[String]) -> Result<Value, AgentError> {
        if items.is_empty() {
            return Ok(json!({}));
        }

        tracing::info!(
            item_count = items.len(),
            model = %self.client.model(),
            "Organizing groceries with Gemini"
        );

        let organized = self.generate_json(&organize_prompt(items)).await?;
        if !organized.is_object() {
            return Err(AgentError::InvalidResponse(
                "expected a JSON object mapping categories to items".to_string(),
            ));
        }
        Ok(organized)
    }

    async fn suggest_groceries_for_recipe(&self, recipe: &str) -> Result<Value, AgentError> {
        let recipe = recipe.trim();
        if recipe.is_empty() {
            return Ok(json!({ "ingredients": [] }));
        }

        tracing::info!(
            recipe_len = recipe.len(),
            model = %self.client.model(),
            "Suggesting recipe groceries with Gemini"
        );

        let suggestion = self.generate_json(&recipe_prompt(recipe)).await?;
        if !suggestion
            .get("ingredients")
            .is_some_and(|ingredients| ingredients.is_array())
        {
            return Err(AgentError::InvalidResponse(
                "expected a JSON object with an \"ingredients\" array".to_string(),
            ));
        }
        Ok(suggestion)
    }
}

fn organize_prompt(items: &[String]) -> String {
    let listed = serde_json::to_string(items).unwrap_or_default();
    format!(
        "You are a grocery shopping assistant. Group the following grocery items \
         into supermarket categories such as Produce, Dairy & Eggs, Meat & Seafood, \
         Bakery, Pantry, Frozen, Beverages, Snacks and Household. \
         Fix obvious spelling mistakes but do not invent items. \
         Respond with a single JSON object whose keys are category names and whose \
         values are arrays of item names.\n\nItems: {}",
        listed
    )
}

fn recipe_prompt(recipe: &str) -> String {
    format!(
        "You are a grocery shopping assistant. List the groceries needed to cook \
         the recipe below. Respond with a single JSON object of the form \
         {{\"ingredients\": [{{\"item\": string, \"quantity\": string, \"category\": string}}]}} \
         where category is a supermarket category such as Produce or Dairy & Eggs.\n\n\
         Recipe: {}",
        recipe
    )
}

/// Parse model output as JSON
///
/// Models sometimes wrap JSON in a Markdown code fence even in JSON mode.
pub fn parse_model_json(text: &str) -> Result<Value, AgentError> {
    let trimmed = strip_code_fence(text.trim());
    serde_json::from_str(trimmed).map_err(|e| {
        AgentError::InvalidResponse(format!("model output is not valid JSON: {}", e))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line (e.g. ```json)
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn agent_for(base_url: &str) -> GeminiAgent {
        GeminiAgent::new(GeminiClient::new(
            reqwest::Client::new(),
            "test-key",
            "gemini-2.5-flash",
            base_url,
        ))
    }

    fn model_reply(text: &str) -> String {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" }
            }]
        })
        .to_string()
    }

    #[test]
    fn test_parse_model_json_plain() {
        let value = parse_model_json(r#" {"Produce": ["apples"]} "#).unwrap();
        assert_eq!(value, json!({"Produce": ["apples"]}));
    }

    #[test]
    fn test_parse_model_json_fenced() {
        let text = "```json\n{\"Dairy\": [\"milk\"]}\n```";
        assert_eq!(parse_model_json(text).unwrap(), json!({"Dairy": ["milk"]}));
    }

    #[test]
    fn test_parse_model_json_rejects_prose() {
        let err = parse_model_json("Sure! Here is your list.").unwrap_err();
        assert!(matches!(err, AgentError::InvalidResponse(_)));
    }

    #[test]
    fn test_organize_prompt_lists_items() {
        let prompt = organize_prompt(&["milk".to_string(), "eggs".to_string()]);
        assert!(prompt.contains(r#"["milk","eggs"]"#));
    }

    #[tokio::test]
    async fn test_empty_inputs_skip_the_api() {
        // Unreachable base URL: any network call would fail
        let agent = agent_for("http://127.0.0.1:9");
        assert_eq!(agent.organize_groceries(&[]).await.unwrap(), json!({}));
        assert_eq!(
            agent.suggest_groceries_for_recipe("   ").await.unwrap(),
            json!({"ingredients": []})
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_organize_groceries_returns_model_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("milk".to_string()))
            .with_status(200)
            .with_body(model_reply(
                r#"{"Dairy & Eggs": ["milk", "eggs"], "Produce": ["bananas"]}"#,
            ))
            .create_async()
            .await;

        let agent = agent_for(&server.url());
        let items = vec!["milk".to_string(), "eggs".to_string(), "bananas".to_string()];
        let result = agent.organize_groceries(&items).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            json!({"Dairy & Eggs": ["milk", "eggs"], "Produce": ["bananas"]})
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_organize_groceries_rejects_non_object() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(model_reply(r#"["milk", "eggs"]"#))
            .create_async()
            .await;

        let agent = agent_for(&server.url());
        let result = agent.organize_groceries(&["milk".to_string()]).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(AgentError::InvalidResponse(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_suggest_groceries_for_recipe() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("Recipe: pasta".to_string()))
            .with_status(200)
            .with_body(model_reply(
                r#"{"ingredients": [{"item": "spaghetti", "quantity": "500 g", "category": "Pantry"}]}"#,
            ))
            .create_async()
            .await;

        let agent = agent_for(&server.url());
        let result = agent.suggest_groceries_for_recipe("pasta").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result["ingredients"][0]["item"], "spaghetti");
    }

    #[tokio::test]
    #[serial]
    async fn test_suggest_groceries_requires_ingredients_array() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(model_reply(r#"{"groceries": "flour"}"#))
            .create_async()
            .await;

        let agent = agent_for(&server.url());
        let result = agent.suggest_groceries_for_recipe("bread").await;

        mock.assert_async().await;
        assert!(result.unwrap_err().to_string().contains("ingredients"));
    }

    #[tokio::test]
    #[serial]
    async fn test_api_errors_propagate() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let agent = agent_for(&server.url());
        let result = agent.organize_groceries(&["milk".to_string()]).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(AgentError::Status { status: 500, .. })
        ));
    }
}
