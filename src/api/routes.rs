//! API Routes
//!
//! Configures the Axum router for the caching proxy.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, health_handler, invalidate_handler, proxy_handler, public_stats_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/*path` - Cached forward to the upstream statistics API
/// - `GET /dashboard/public-stats` - Typed public dashboard statistics
/// - `POST /cache/invalidate` - Drop one cached response
/// - `POST /cache/clear` - Drop everything (logout)
/// - `GET /cache/stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, as the dashboard is served from elsewhere
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/*path", post(proxy_handler))
        .route("/dashboard/public-stats", get(public_stats_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/cache/clear", post(clear_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
