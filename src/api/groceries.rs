//! Grocery API handlers
//!
//! Both endpoints read one field from the body, forward it to the grocery
//! agent and wrap the agent's answer under a single success key.

use crate::api::utils::{item_names, parse_payload};
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

/// Body of POST /grocery-list
#[derive(Debug, Default, Deserialize)]
pub struct GroceryListRequest {
    /// Items to organize; missing or null means no items
    #[serde(default)]
    pub items: Option<Vec<Value>>,
}

/// Response of POST /grocery-list
#[derive(Debug, Serialize)]
pub struct GroceryListResponse {
    /// Agent output, passed through verbatim
    pub organized_list: Value,
}

/// Body of POST /recipe-groceries
#[derive(Debug, Default, Deserialize)]
pub struct RecipeGroceriesRequest {
    /// Recipe to shop for; missing or null means the empty string
    #[serde(default)]
    pub recipe: Option<String>,
}

/// Response of POST /recipe-groceries
#[derive(Debug, Serialize)]
pub struct RecipeGroceriesResponse {
    /// Agent output, passed through verbatim
    pub groceries: Value,
}

/// POST /grocery-list - Group grocery items by category
pub async fn organize_grocery_list(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GroceryListResponse>, AppError> {
    let request: GroceryListRequest = parse_payload(body).inspect_err(|e| {
        error!(error = %e, "Rejected grocery list request");
    })?;
    let items = item_names(request.items.unwrap_or_default());

    info!(item_count = items.len(), "Organizing grocery list");

    let organized_list = state
        .agent
        .organize_groceries(&items)
        .await
        .inspect_err(|e| {
            error!(error = %e, item_count = items.len(), "Failed to organize groceries");
        })?;

    Ok(Json(GroceryListResponse { organized_list }))
}

/// POST /recipe-groceries - Suggest groceries for a recipe
pub async fn recipe_groceries(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecipeGroceriesResponse>, AppError> {
    let request: RecipeGroceriesRequest = parse_payload(body).inspect_err(|e| {
        error!(error = %e, "Rejected recipe groceries request");
    })?;
    let recipe = request.recipe.unwrap_or_default();

    info!(recipe = %recipe, "Suggesting groceries for recipe");

    let groceries = state
        .agent
        .suggest_groceries_for_recipe(&recipe)
        .await
        .inspect_err(|e| {
            error!(error = %e, recipe = %recipe, "Failed to suggest groceries");
        })?;

    Ok(Json(RecipeGroceriesResponse { groceries }))
}
