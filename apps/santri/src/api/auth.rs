//! Request guards for `/api`: API-key check and global rate limit.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use subtle::ConstantTimeEq;
use tracing::warn;

use super::error::ApiError;

/// Alternate header for clients that cannot set `Authorization`.
pub const API_KEY_HEADER: &str = "x-api-key";

// =============================================================================
// API KEY
// =============================================================================

/// The configured key, shared by every request.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: &str) -> Self {
        Self(Arc::from(key))
    }

    /// Constant-time comparison against a presented key.
    pub fn verify(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

/// Key presented as `Authorization: Bearer <key>` or `X-API-Key: <key>`.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .or_else(|| {
            headers
                .get(API_KEY_HEADER)
                .and_then(|value| value.to_str().ok())
        })
}

/// Reject requests that do not carry the configured key.
pub async fn require_api_key(State(key): State<ApiKey>, request: Request, next: Next) -> Response {
    let authorized = presented_key(request.headers()).is_some_and(|candidate| key.verify(candidate));
    if !authorized {
        warn!(path = %request.uri().path(), "rejected request without a valid API key");
        return ApiError::Unauthorized.into_response();
    }
    next.run(request).await
}

// =============================================================================
// RATE LIMIT
// =============================================================================

/// Process-wide limiter shared by all `/api` routes.
pub type SharedLimiter = Arc<DefaultDirectRateLimiter>;

pub fn rate_limiter(per_second: NonZeroU32) -> SharedLimiter {
    Arc::new(RateLimiter::direct(Quota::per_second(per_second)))
}

/// Reject requests over the quota with 429.
pub async fn rate_limit(
    State(limiter): State<SharedLimiter>,
    request: Request,
    next: Next,
) -> Response {
    if limiter.check().is_err() {
        warn!(path = %request.uri().path(), "rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn verify_requires_exact_match() {
        let key = ApiKey::new("s3cret");
        assert!(key.verify("s3cret"));
        assert!(!key.verify("s3cre"));
        assert!(!key.verify("S3CRET"));
        assert!(!key.verify(""));
    }

    #[test]
    fn bearer_header_wins_over_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("other"));
        assert_eq!(presented_key(&headers), Some("other"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token"));
        assert_eq!(presented_key(&headers), Some("token"));
    }

    #[test]
    fn missing_headers_present_nothing() {
        assert_eq!(presented_key(&HeaderMap::new()), None);
    }
}
