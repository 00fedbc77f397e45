//! Voice Grocery Backend
//!
//! A small REST API that organizes spoken grocery lists into store categories
//! and suggests the groceries needed for a recipe.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voice_grocery_backend::agent::api_client::GeminiClient;
use voice_grocery_backend::agent::{CatalogAgent, GeminiAgent, GroceryAgent};
use voice_grocery_backend::config::{AgentConfig, Config, Environment};
use voice_grocery_backend::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(config.environment))),
        )
        .init();

    info!("Configuration loaded: {:?}", config);

    let agent = select_agent(&config.agent)?;
    let app = build_router(AppState::new(agent), &config.cors);

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("🚀 Server running on http://{}", addr);
    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Voice grocery backend started"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Log filter used when `RUST_LOG` is not set
fn default_log_filter(environment: Environment) -> &'static str {
    match environment {
        Environment::Development => "voice_grocery_backend=debug,tower_http=debug,info",
        Environment::Production | Environment::Test => "info",
    }
}

/// Pick the grocery agent: Gemini when an API key is configured, the offline
/// catalog otherwise
fn select_agent(config: &AgentConfig) -> anyhow::Result<Arc<dyn GroceryAgent>> {
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set, using offline catalog agent");
        return Ok(Arc::new(CatalogAgent::new()));
    }

    let client = GeminiClient::from_config(config)?;
    info!(model = %client.model(), "Using Gemini grocery agent");
    Ok(Arc::new(GeminiAgent::new(client)))
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
