//! Predictions Module
//!
//! In-memory records of submitted surveys and the scores returned for them.
//! Scoring itself happens in the external prediction service.

mod record;
mod store;

pub use record::{PredictionKind, PredictionRecord};
pub use store::{DashboardSummary, PredictionStore};
