//! Caller Identity
//!
//! Resolves who is calling from the `x-user-id` header set by the upstream
//! authentication gateway and exposes it as a request extension.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::cache::ANONYMOUS_OWNER;
use crate::error::AppError;

/// Header carrying the authenticated caller id.
pub const USER_ID_HEADER: &str = "x-user-id";

// == Owner ==
/// Authenticated caller id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Reads the caller id from request headers.
///
/// Blank values count as absent, and so does the reserved anonymous id: it
/// keys unauthenticated cache entries and must never name a real caller.
pub fn owner_from_headers(headers: &HeaderMap) -> Option<Owner> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && *id != ANONYMOUS_OWNER)
        .map(|id| Owner(id.to_string()))
}

/// Middleware attaching [`Owner`] to requests that carry a caller id.
pub async fn identify(mut request: Request, next: Next) -> Response {
    if let Some(owner) = owner_from_headers(request.headers()) {
        request.extensions_mut().insert(owner);
    }
    next.run(request).await
}

/// Handlers taking `Owner` reject anonymous callers.
#[async_trait]
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Owner>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))
    }
}
