//! Offline grocery agent
//!
//! Categorizes items with a built-in keyword table and answers recipe
//! requests from a small recipe book. Used when no Gemini API key is
//! configured, so the service stays usable without network access.

use crate::agent::{AgentError, GroceryAgent};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Category for items that match no keyword
pub const OTHER_CATEGORY: &str = "Other";

/// Keyword table: category -> keywords matched against item words
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Produce",
        &[
            "apple", "banana", "orange", "lemon", "lime", "grape", "berry", "strawberry",
            "blueberry", "avocado", "tomato", "potato", "onion", "garlic", "ginger", "carrot",
            "celery", "lettuce", "spinach", "kale", "cucumber", "pepper", "broccoli",
            "cauliflower", "mushroom", "zucchini", "herb", "basil", "cilantro", "parsley",
            "mango", "pear", "peach", "cabbage", "corn",
        ],
    ),
    (
        "Dairy & Eggs",
        &[
            "milk", "cheese", "butter", "yogurt", "yoghurt", "cream", "egg", "eggs",
            "parmesan", "mozzarella", "cheddar", "paneer", "ghee",
        ],
    ),
    (
        "Meat & Seafood",
        &[
            "chicken", "beef", "pork", "lamb", "mutton", "turkey", "bacon", "sausage", "ham",
            "fish", "salmon", "tuna", "shrimp", "prawn", "mince",
        ],
    ),
    (
        "Bakery",
        &["bread", "bagel", "bun", "roll", "croissant", "tortilla", "muffin", "pita", "naan"],
    ),
    (
        "Pantry",
        &[
            "rice", "pasta", "spaghetti", "noodle", "flour", "sugar", "salt", "oil", "vinegar",
            "sauce", "bean", "lentil", "dal", "cereal", "oats", "honey", "jam", "spice",
            "cumin", "turmeric", "stock", "broth", "can", "canned", "yeast", "baking",
        ],
    ),
    ("Frozen", &["frozen", "ice", "peas"]),
    (
        "Beverages",
        &["water", "juice", "coffee", "tea", "soda", "beer", "wine", "cola"],
    ),
    (
        "Snacks",
        &["chips", "crisps", "cookie", "biscuit", "chocolate", "candy", "nuts", "popcorn", "cracker"],
    ),
    (
        "Household",
        &[
            "soap", "detergent", "tissue", "paper", "towel", "toilet", "shampoo", "toothpaste",
            "sponge", "bleach", "foil",
        ],
    ),
];

/// Recipe book: recipe keyword -> (ingredient, quantity)
const RECIPES: &[(&str, &[(&str, &str)])] = &[
    (
        "pasta",
        &[
            ("spaghetti", "500 g"),
            ("tomatoes", "4"),
            ("garlic", "3 cloves"),
            ("olive oil", "2 tbsp"),
            ("parmesan", "50 g"),
            ("basil", "1 bunch"),
        ],
    ),
    (
        "pancake",
        &[
            ("flour", "200 g"),
            ("milk", "300 ml"),
            ("eggs", "2"),
            ("butter", "30 g"),
            ("sugar", "1 tbsp"),
            ("baking powder", "2 tsp"),
        ],
    ),
    (
        "omelette",
        &[
            ("eggs", "3"),
            ("milk", "2 tbsp"),
            ("cheddar", "30 g"),
            ("onion", "1"),
            ("bell pepper", "1"),
        ],
    ),
    (
        "salad",
        &[
            ("lettuce", "1 head"),
            ("tomatoes", "2"),
            ("cucumber", "1"),
            ("olive oil", "2 tbsp"),
            ("lemon", "1"),
        ],
    ),
    (
        "tacos",
        &[
            ("tortillas", "8"),
            ("beef mince", "500 g"),
            ("onion", "1"),
            ("tomatoes", "2"),
            ("lettuce", "1 head"),
            ("cheddar", "100 g"),
        ],
    ),
    (
        "curry",
        &[
            ("chicken thighs", "600 g"),
            ("onion", "2"),
            ("garlic", "4 cloves"),
            ("ginger", "1 piece"),
            ("tomatoes", "3"),
            ("curry spice", "2 tbsp"),
            ("rice", "300 g"),
        ],
    ),
];

/// Keyword-based grocery agent
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogAgent;

impl CatalogAgent {
    /// Create the catalog agent
    pub fn new() -> Self {
        Self
    }
}

/// Find the store category for an item name
///
/// Matches whole words, with a plural `s`/`es` tolerated.
pub fn categorize(item: &str) -> &'static str {
    let lowered = item.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CATEGORIES
        .iter()
        .find(|(_, keywords)| {
            words.iter().any(|word| {
                keywords.iter().any(|keyword| {
                    *word == *keyword
                        || word.strip_suffix('s') == Some(*keyword)
                        || word.strip_suffix("es") == Some(*keyword)
                })
            })
        })
        .map(|(category, _)| *category)
        .unwrap_or(OTHER_CATEGORY)
}

#[async_trait]
impl GroceryAgent for CatalogAgent {
    async fn organize_groceries(&self, items: &[String]) -> Result<Value, AgentError> {
        let mut seen = HashSet::new();
        let mut organized = Map::new();

        for item in items.iter().map(|i| i.trim()).filter(|i| !i.is_empty()) {
            if !seen.insert(item.to_lowercase()) {
                continue;
            }
            let bucket = organized
                .entry(categorize(item))
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = bucket {
                list.push(Value::String(item.to_string()));
            }
        }

        tracing::debug!(
            item_count = seen.len(),
            category_count = organized.len(),
            "Organized groceries from catalog"
        );

        Ok(Value::Object(organized))
    }

    async fn suggest_groceries_for_recipe(&self, recipe: &str) -> Result<Value, AgentError> {
        let lowered = recipe.trim().to_lowercase();
        if lowered.is_empty() {
            return Ok(json!({ "ingredients": [] }));
        }

        let ingredients: Vec<Value> = RECIPES
            .iter()
            .find(|(name, _)| lowered.contains(name))
            .map(|(_, ingredients)| {
                ingredients
                    .iter()
                    .map(|(item, quantity)| {
                        json!({
                            "item": item,
                            "quantity": quantity,
                            "category": categorize(item),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        if ingredients.is_empty() {
            tracing::debug!(recipe = %recipe, "Recipe not found in catalog");
        }

        Ok(json!({ "ingredients": ingredients }))
    }
}
