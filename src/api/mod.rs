//! API Module
//!
//! HTTP handlers and routing for the explorer gateway.
//!
//! # Endpoints
//! - `GET /search?q=` - Suggestions for a partial name
//! - `GET /country/:code` - Country details with neighbors
//! - `GET /compare/:first/:second` - Side-by-side comparison
//! - `GET /stats` - Lookup cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
