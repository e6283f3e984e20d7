//! API Handlers
//!
//! HTTP request handlers for the prediction, dashboard and cache admin
//! endpoints. Handlers that change a caller's records invalidate that
//! caller's cached reads before responding.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::identity::Owner;
use crate::cache::{ResponseCache, MAX_PAYLOAD_SIZE};
use crate::error::{AppError, Result};
use crate::models::{
    CacheStatsResponse, ClearCacheQuery, ClearCacheResponse, CreatePredictionRequest,
    DashboardResponse, DeleteResponse, HealthResponse, ListQuery, ModelsResponse,
    PredictionListResponse, PredictionResponse,
};
use crate::predictions::{PredictionKind, PredictionStore};

/// Application state shared across all handlers.
///
/// Built once by the composition root. The cache handle is shared with the
/// sweep task.
#[derive(Clone)]
pub struct AppState {
    /// Response cache for read routes
    pub cache: Arc<ResponseCache>,
    /// Thread-safe prediction records
    pub predictions: Arc<RwLock<PredictionStore>>,
    /// Largest body the read routes will cache
    pub max_payload_bytes: usize,
}

impl AppState {
    /// Creates a new AppState around the given cache with no records.
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self {
            cache,
            predictions: Arc::new(RwLock::new(PredictionStore::new())),
            max_payload_bytes: MAX_PAYLOAD_SIZE,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            max_payload_bytes: config.max_payload_bytes,
            ..Self::new(Arc::new(ResponseCache::new()))
        }
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /api/models
///
/// Public; anonymous callers share one cache entry.
pub async fn models_handler() -> Json<ModelsResponse> {
    Json(ModelsResponse::available())
}

/// Handler for POST /api/predictions/:kind
pub async fn create_prediction_handler(
    State(state): State<AppState>,
    owner: Owner,
    Path(kind): Path<PredictionKind>,
    Json(req): Json<CreatePredictionRequest>,
) -> Result<(StatusCode, Json<PredictionResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let record = {
        let mut predictions = state.predictions.write().await;
        predictions.create(owner.id(), kind, req.input, req.scores)
    };
    state.cache.invalidate_by_owner(owner.id()).await;
    info!(owner = owner.id(), id = record.id, kind = %record.kind, "prediction created");

    Ok((StatusCode::CREATED, Json(PredictionResponse::new(record))))
}

/// Handler for GET /api/predictions
pub async fn list_predictions_handler(
    State(state): State<AppState>,
    owner: Owner,
    Query(query): Query<ListQuery>,
) -> Json<PredictionListResponse> {
    let predictions = state.predictions.read().await;
    Json(PredictionListResponse::new(
        predictions.list(owner.id(), query.kind),
    ))
}

/// Handler for GET /api/predictions/:id
pub async fn get_prediction_handler(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<u64>,
) -> Result<Json<PredictionResponse>> {
    let predictions = state.predictions.read().await;
    let record = predictions
        .get(owner.id(), id)
        .ok_or_else(|| AppError::NotFound(format!("Prediction {}", id)))?;

    Ok(Json(PredictionResponse::new(record)))
}

/// Handler for DELETE /api/predictions/:id
pub async fn delete_prediction_handler(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.predictions.write().await.delete(owner.id(), id);
    if !deleted {
        return Err(AppError::NotFound(format!("Prediction {}", id)));
    }
    state.cache.invalidate_by_owner(owner.id()).await;

    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /api/users/dashboard
pub async fn dashboard_handler(
    State(state): State<AppState>,
    owner: Owner,
) -> Json<DashboardResponse> {
    let predictions = state.predictions.read().await;
    Json(DashboardResponse::new(predictions.dashboard(owner.id())))
}

/// Handler for GET /api/admin/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::new(state.cache.stats().await))
}

/// Handler for DELETE /api/admin/cache
///
/// Clears everything, or only keys containing `?pattern=`.
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    Query(query): Query<ClearCacheQuery>,
) -> Result<Json<ClearCacheResponse>> {
    let cleared = match query.pattern.as_deref() {
        Some("") => {
            return Err(AppError::InvalidRequest(
                "Pattern cannot be empty".to_string(),
            ))
        }
        Some(pattern) => state.cache.invalidate_by_pattern(pattern).await,
        None => state.cache.invalidate_all().await,
    };

    Ok(Json(ClearCacheResponse::new(cleared, query.pattern)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::new(Arc::new(ResponseCache::new()))
    }

    fn owner(id: &str) -> Owner {
        Owner(id.to_string())
    }

    fn create_request(input: serde_json::Value) -> CreatePredictionRequest {
        serde_json::from_value(json!({"input": input})).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_prediction() {
        let state = test_state();

        let (status, created) = create_prediction_handler(
            State(state.clone()),
            owner("u1"),
            Path(PredictionKind::Stress),
            Json(create_request(json!({"sleepHours": 7}))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let fetched = get_prediction_handler(State(state), owner("u1"), Path(created.data.id))
            .await
            .unwrap();
        assert_eq!(fetched.data.input, json!({"sleepHours": 7}));
    }

    #[tokio::test]
    async fn test_create_invalidates_owner_cache() {
        let state = test_state();
        state
            .cache
            .store("u1:/api/predictions".to_string(), json!({"count": 0}))
            .await;
        state
            .cache
            .store("u2:/api/predictions".to_string(), json!({"count": 0}))
            .await;

        create_prediction_handler(
            State(state.clone()),
            owner("u1"),
            Path(PredictionKind::Stress),
            Json(create_request(json!({}))),
        )
        .await
        .unwrap();

        let stats = state.cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.entries[0].key, "u2:/api/predictions");
    }

    #[tokio::test]
    async fn test_create_invalid_input() {
        let state = test_state();
        let result = create_prediction_handler(
            State(state),
            owner("u1"),
            Path(PredictionKind::Stress),
            Json(create_request(json!("not an object"))),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_get_other_owners_prediction() {
        let state = test_state();
        let (_, created) = create_prediction_handler(
            State(state.clone()),
            owner("u1"),
            Path(PredictionKind::Stress),
            Json(create_request(json!({}))),
        )
        .await
        .unwrap();

        let result = get_prediction_handler(State(state), owner("u2"), Path(created.data.id)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_prediction() {
        let state = test_state();
        let (_, created) = create_prediction_handler(
            State(state.clone()),
            owner("u1"),
            Path(PredictionKind::Stress),
            Json(create_request(json!({}))),
        )
        .await
        .unwrap();
        state
            .cache
            .store("u1:/api/users/dashboard".to_string(), json!({}))
            .await;

        let result =
            delete_prediction_handler(State(state.clone()), owner("u1"), Path(created.data.id)).await;
        assert!(result.is_ok());
        assert!(state.cache.is_empty().await);

        let again = delete_prediction_handler(State(state), owner("u1"), Path(created.data.id)).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clear_cache_by_pattern_and_all() {
        let state = test_state();
        state.cache.store("u1:/a".to_string(), json!({})).await;
        state.cache.store("u2:/a".to_string(), json!({})).await;
        state.cache.store("u2:/b".to_string(), json!({})).await;

        let by_pattern = clear_cache_handler(
            State(state.clone()),
            Query(ClearCacheQuery {
                pattern: Some("u2".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(by_pattern.cleared, 2);

        let all = clear_cache_handler(State(state.clone()), Query(ClearCacheQuery::default()))
            .await
            .unwrap();
        assert_eq!(all.cleared, 1);
        assert_eq!(cache_stats_handler(State(state)).await.stats.total_entries, 0);
    }

    #[tokio::test]
    async fn test_clear_cache_empty_pattern() {
        let state = test_state();
        let result = clear_cache_handler(
            State(state),
            Query(ClearCacheQuery {
                pattern: Some(String::new()),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
