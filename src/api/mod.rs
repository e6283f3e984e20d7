//! API Module
//!
//! HTTP handlers and routing for the WellSync REST API. Read routes are
//! served through the response cache; write routes bypass it and invalidate
//! the caller's entries.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /api/models` - Available prediction types
//! - `GET /api/predictions` - List the caller's predictions
//! - `POST /api/predictions/:kind` - Record a prediction of that kind
//! - `GET|DELETE /api/predictions/:id` - Fetch or delete one prediction
//! - `GET /api/users/dashboard` - Per-caller summary
//! - `GET /api/admin/cache/stats` - Cache statistics
//! - `DELETE /api/admin/cache` - Cache invalidation

pub mod cache_layer;
pub mod handlers;
pub mod identity;
pub mod routes;

pub use cache_layer::{cache_response, RouteCache};
pub use handlers::*;
pub use identity::{identify, Owner, USER_ID_HEADER};
pub use routes::create_router;
