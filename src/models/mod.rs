//! Request and Response models for the WellSync API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ClearCacheQuery, CreatePredictionRequest, ListQuery};
pub use responses::{
    CacheStatsResponse, ClearCacheResponse, DashboardResponse, DeleteResponse, ErrorResponse,
    HealthResponse, ModelInfo, ModelsResponse, PredictionListResponse, PredictionResponse,
};
