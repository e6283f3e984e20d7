//! Response DTOs for the WellSync API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::predictions::{DashboardSummary, PredictionKind, PredictionRecord};

/// Response body for a single prediction (POST /api/predictions/:kind, GET /api/predictions/:id)
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub data: PredictionRecord,
}

impl PredictionResponse {
    pub fn new(data: PredictionRecord) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response body for GET /api/predictions
#[derive(Debug, Clone, Serialize)]
pub struct PredictionListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<PredictionRecord>,
}

impl PredictionListResponse {
    pub fn new(data: Vec<PredictionRecord>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Response body for DELETE /api/predictions/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    /// Success message
    pub message: String,
    /// The id that was deleted
    pub id: u64,
}

impl DeleteResponse {
    pub fn new(id: u64) -> Self {
        Self {
            success: true,
            message: format!("Prediction {} deleted successfully", id),
            id,
        }
    }
}

/// Response body for GET /api/users/dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub data: DashboardSummary,
}

impl DashboardResponse {
    pub fn new(data: DashboardSummary) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// One entry of GET /api/models
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    #[serde(rename = "type")]
    pub kind: PredictionKind,
    pub description: String,
}

/// Response body for GET /api/models
#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

impl ModelsResponse {
    pub fn available() -> Self {
        Self {
            models: PredictionKind::ALL
                .iter()
                .map(|kind| ModelInfo {
                    kind: *kind,
                    description: kind.description().to_string(),
                })
                .collect(),
        }
    }
}

/// Response body for GET /api/admin/cache/stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// hits / (hits + misses), 0.0 before the first lookup
    pub hit_rate: f64,
    /// Sum of the listed entries' sizes in bytes
    pub total_size: usize,
}

impl CacheStatsResponse {
    pub fn new(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            total_size: stats.total_size(),
            stats,
        }
    }
}

/// Response body for DELETE /api/admin/cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    /// Number of entries removed
    pub cleared: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ClearCacheResponse {
    pub fn new(cleared: usize, pattern: Option<String>) -> Self {
        Self {
            success: true,
            cleared,
            pattern,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
