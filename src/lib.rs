//! WellSync - prediction records API with an in-memory response cache
//!
//! Read routes are memoized per caller and path under named freshness
//! classes; writers invalidate by owner or key pattern, and a background
//! sweep bounds how long any entry can live.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod predictions;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{DurationClass, ResponseCache};
pub use config::Config;
pub use tasks::spawn_sweep_task;
