//! API Routes
//!
//! Configures the Axum router with all explorer gateway endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    compare_handler, country_handler, health_handler, search_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /search?q=` - Suggestions for a partial name
/// - `GET /country/:code` - Country details with neighbors
/// - `GET /compare/:first/:second` - Side-by-side comparison
/// - `GET /stats` - Lookup cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin so a browser front end can call the gateway
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(search_handler))
        .route("/country/:code", get(country_handler))
        .route("/compare/:first/:second", get(compare_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
