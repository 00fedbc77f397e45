use crate::agent::GroceryAgent;
use std::sync::Arc;

/// Application state
///
/// Requests share nothing mutable; the only shared piece is the agent that
/// does the actual grocery work.
#[derive(Clone)]
pub struct AppState {
    /// Delegate that organizes groceries and suggests recipe ingredients
    pub agent: Arc<dyn GroceryAgent>,
}

impl AppState {
    /// Create state around the given agent
    pub fn new(agent: Arc<dyn GroceryAgent>) -> Self {
        Self { agent }
    }
}
