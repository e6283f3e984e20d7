//! Request DTOs for the WellSync API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::predictions::PredictionKind;

/// Request body for POST /api/predictions/:kind
///
/// # Fields
/// - `input`: The survey answers, a JSON object
/// - `scores`: Optional scores returned by the prediction service
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePredictionRequest {
    pub input: Value,
    #[serde(default)]
    pub scores: Option<Value>,
}

impl CreatePredictionRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if !self.input.is_object() {
            return Some("Input must be a JSON object".to_string());
        }
        if matches!(&self.scores, Some(scores) if !scores.is_object()) {
            return Some("Scores must be a JSON object".to_string());
        }
        None
    }
}

/// Query string for GET /api/predictions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<PredictionKind>,
}

/// Query string for DELETE /api/admin/cache
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearCacheQuery {
    /// Only entries whose key contains this substring are removed
    pub pattern: Option<String>,
}
