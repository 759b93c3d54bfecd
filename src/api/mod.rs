//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `POST /api/*path` - Forward to the upstream API through the cache
//! - `GET /dashboard/public-stats` - Typed public statistics
//! - `POST /cache/invalidate` - Remove one cached response
//! - `POST /cache/clear` - Clear the whole cache
//! - `GET /cache/stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
