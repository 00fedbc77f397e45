//! API module
//!
//! Contains HTTP request handlers for the health check and grocery endpoints

pub mod groceries;
pub mod health;
pub mod utils;
