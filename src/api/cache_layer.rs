//! Cache Route Layer
//!
//! Middleware serving GET routes through the [`ResponseCache`]. Attach it to a
//! route with the duration class that route's data tolerates:
//!
//! ```ignore
//! get(list_predictions).layer(from_fn_with_state(
//!     RouteCache::new(cache.clone(), DurationClass::Short, max_bytes),
//!     cache_response,
//! ))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use super::identity::Owner;
use crate::cache::{cache_key, Computed, DurationClass, ResponseCache, Served};
use crate::error::AppError;

// == Route Cache ==
/// Per-route cache settings handed to [`cache_response`].
#[derive(Clone)]
pub struct RouteCache {
    pub cache: Arc<ResponseCache>,
    pub class: DurationClass,
    /// Bodies larger than this are passed through without being stored
    pub max_payload_bytes: usize,
}

impl RouteCache {
    pub fn new(cache: Arc<ResponseCache>, class: DurationClass, max_payload_bytes: usize) -> Self {
        Self {
            cache,
            class,
            max_payload_bytes,
        }
    }
}

/// Serves GET requests from the cache or records the handler's response.
///
/// Other methods pass straight through. A hit is answered without running the
/// handler; a miss returns the handler's response exactly as produced.
pub async fn cache_response(
    State(route): State<RouteCache>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let owner = request.extensions().get::<Owner>().map(|o| o.0.clone());
    let full_path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let key = cache_key(owner.as_deref(), &full_path);
    let max_payload_bytes = route.max_payload_bytes;

    let served = route
        .cache
        .get_or_compute(&key, route.class, || async move {
            capture(next.run(request).await, max_payload_bytes).await
        })
        .await;

    match served {
        Served::Hit(body) => Json(body).into_response(),
        Served::Computed(response) => response,
    }
}

/// Buffers a handler response and decides whether it can be stored.
///
/// Only 2xx JSON bodies within the size limit are stored. The response is
/// rebuilt from the buffered bytes either way.
async fn capture(response: Response, max_payload_bytes: usize) -> Computed<Response> {
    if !response.status().is_success() || !is_json(&response) {
        return Computed::Skip(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, "failed to buffer response body");
            return Computed::Skip(
                AppError::Internal("Failed to read response body".to_string()).into_response(),
            );
        }
    };

    let payload = if bytes.len() <= max_payload_bytes {
        serde_json::from_slice::<Value>(&bytes).ok()
    } else {
        debug!(size = bytes.len(), "response too large to cache");
        None
    };

    let response = Response::from_parts(parts, Body::from(bytes));
    match payload {
        Some(payload) => Computed::Store(payload, response),
        None => Computed::Skip(response),
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false)
}
