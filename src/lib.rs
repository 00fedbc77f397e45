//! Voice Grocery Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod router;
/// Shared application state handed to every handler
pub mod state;

pub use router::build_router;
pub use state::AppState;
