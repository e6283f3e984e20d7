//! API Routes
//!
//! Configures the Axum router with all WellSync endpoints.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::cache_layer::{cache_response, RouteCache};
use super::handlers::{
    cache_stats_handler, clear_cache_handler, create_prediction_handler,
    dashboard_handler, delete_prediction_handler, get_prediction_handler, health_handler,
    list_predictions_handler, models_handler, AppState,
};
use super::identity::identify;
use crate::cache::DurationClass;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /api/models` - Available prediction types (cached, long)
/// - `GET /api/predictions` - Caller's predictions (cached, short)
/// - `POST /api/predictions/:kind` - Record a prediction of that kind
/// - `GET /api/predictions/:id` - One prediction (cached, medium)
/// - `DELETE /api/predictions/:id` - Delete a prediction
/// - `GET /api/users/dashboard` - Caller's dashboard (cached, medium)
/// - `GET /api/admin/cache/stats` - Cache statistics
/// - `DELETE /api/admin/cache` - Clear cache, optionally by `?pattern=`
///
/// # Middleware
/// - Identity: resolves the caller before any cache lookup
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cache = state.cache.clone();
    let max_payload_bytes = state.max_payload_bytes;
    let cached = move |class: DurationClass, route: MethodRouter<AppState>| -> MethodRouter<AppState> {
        route.layer(from_fn_with_state(
            RouteCache::new(cache.clone(), class, max_payload_bytes),
            cache_response,
        ))
    };

    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/models",
            cached(DurationClass::Long, get(models_handler)),
        )
        .route(
            "/api/predictions",
            cached(DurationClass::Short, get(list_predictions_handler)),
        )
        // One segment: the record id for GET/DELETE, the kind for POST
        .route(
            "/api/predictions/:id",
            cached(
                DurationClass::Medium,
                get(get_prediction_handler)
                    .post(create_prediction_handler)
                    .delete(delete_prediction_handler),
            ),
        )
        .route(
            "/api/users/dashboard",
            cached(DurationClass::Medium, get(dashboard_handler)),
        )
        .route("/api/admin/cache/stats", get(cache_stats_handler))
        .route("/api/admin/cache", delete(clear_cache_handler))
        .layer(from_fn(identify))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
