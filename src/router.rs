//! HTTP router construction
//!
//! The router is built explicitly from state and a CORS policy and handed to
//! the server by `main`; tests build their own with a stub agent.

use crate::api;
use crate::config::{AllowedOrigins, CorsConfig};
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use std::time::Instant;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Build the application router
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        // Health check
        .route("/", get(api::health::health_check))
        .route("/health", get(api::health::health_check))
        // Grocery API
        .route("/grocery-list", post(api::groceries::organize_grocery_list))
        .route("/recipe-groceries", post(api::groceries::recipe_groceries))
        // Middleware (order matters - CORS is outermost so error responses carry its headers)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors_layer(cors))
        .with_state(state)
}

/// Translate a [`CorsConfig`] into a tower-http layer
///
/// Entries that are not valid header values are skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = match &config.allowed_origins {
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect::<Vec<_>>(),
        ),
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| match method.parse::<Method>() {
            Ok(method) => Some(method),
            Err(_) => {
                warn!(method = %method, "Ignoring invalid CORS method");
                None
            }
        })
        .collect();

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|header| match header.parse::<HeaderName>() {
            Ok(name) => Some(name),
            Err(_) => {
                warn!(header = %header, "Ignoring invalid CORS header");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(methods)
        .allow_headers(headers)
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}
