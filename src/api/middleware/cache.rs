//! Response-cache middleware for idempotent reads.
//!
//! GET responses are served from the cache when present and captured into it
//! otherwise; every other method passes through untouched. Cache keys combine
//! the full request path and query with the authenticated principal, so no
//! entry is ever shared across users.

use axum::body::{Body, to_bytes};
use axum::extract::{OriginalUri, Request, State};
use axum::http::{HeaderValue, Method, Uri, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::api::middleware::AuthUser;
use crate::state::AppState;

/// `X-Cache: HIT|MISS` marker header.
pub const CACHE_HEADER: &str = "x-cache";

/// Header carrying the cache key that was used, for observability.
pub const CACHE_KEY_HEADER: &str = "x-cache-key";

/// Sentinel principal for unauthenticated callers.
const ANONYMOUS: &str = "anon";

/// Per-instance cache middleware configuration.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// TTL applied to every key this middleware instance produces.
    pub ttl_seconds: u64,
}

impl CachePolicy {
    pub fn new(ttl_seconds: u64) -> Self {
        Self { ttl_seconds }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self { ttl_seconds: 300 }
    }
}

/// Build the cache key for a request: canonical path+query plus the
/// requesting principal (or the anonymous sentinel).
pub fn response_cache_key(uri: &Uri, principal: Option<&AuthUser>) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    match principal {
        Some(user) => format!("resp:{}:u:{}", path_and_query, user.user_id),
        None => format!("resp:{}:u:{}", path_and_query, ANONYMOUS),
    }
}

/// Cache-aside middleware for GET endpoints.
///
/// On a hit the handler chain is short-circuited with the cached payload.
/// On a miss the downstream response body is buffered, written to the cache
/// before the response leaves this middleware, and forwarded annotated with
/// the MISS marker. Cache failures never surface: the monitor swallows them
/// and the request degrades to recompute-on-every-call.
pub async fn cache_response(
    State((state, policy)): State<(AppState, CachePolicy)>,
    OriginalUri(uri): OriginalUri,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = response_cache_key(&uri, request.extensions().get::<AuthUser>());

    if let Some(cached) = state.cache.get(&key).await {
        return hit_response(cached, &key, policy.ttl_seconds);
    }

    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();

    // Only successful JSON payloads are captured.
    let cacheable = parts.status.is_success()
        && parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

    if !cacheable {
        return Response::from_parts(parts, body);
    }

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to buffer response body for caching");
            return Response::from_parts(parts, Body::empty());
        }
    };

    // The write completes before the response is handed back, so it
    // happens-before transmission; a failed write is only a lost
    // optimization.
    state
        .cache
        .set(&key, bytes.to_vec(), policy.ttl_seconds)
        .await;

    parts
        .headers
        .insert(CACHE_HEADER, HeaderValue::from_static("MISS"));
    if let Ok(value) = HeaderValue::from_str(&key) {
        parts.headers.insert(CACHE_KEY_HEADER, value);
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Short-circuit response emitted for a cache hit.
fn hit_response(payload: Vec<u8>, key: &str, ttl_seconds: u64) -> Response {
    let mut response = Response::new(Body::from(payload));
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(CACHE_HEADER, HeaderValue::from_static("HIT"));
    if let Ok(value) = HeaderValue::from_str(key) {
        headers.insert(CACHE_KEY_HEADER, value);
    }
    // Scoped to the requesting principal, never shareable.
    if let Ok(value) = HeaderValue::from_str(&format!("private, max-age={ttl_seconds}")) {
        headers.insert(header::CACHE_CONTROL, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_includes_path_query_and_principal() {
        let uri: Uri = "/api/posts?page=2".parse().unwrap();
        let user = AuthUser {
            user_id: 7,
            username: "octocat".to_string(),
        };
        assert_eq!(
            response_cache_key(&uri, Some(&user)),
            "resp:/api/posts?page=2:u:7"
        );
    }

    #[test]
    fn anonymous_requests_use_sentinel() {
        let uri: Uri = "/api/posts".parse().unwrap();
        assert_eq!(response_cache_key(&uri, None), "resp:/api/posts:u:anon");
    }

    #[test]
    fn different_principals_produce_different_keys() {
        let uri: Uri = "/api/users/1".parse().unwrap();
        let a = AuthUser {
            user_id: 1,
            username: "a".to_string(),
        };
        let b = AuthUser {
            user_id: 2,
            username: "b".to_string(),
        };
        assert_ne!(
            response_cache_key(&uri, Some(&a)),
            response_cache_key(&uri, Some(&b))
        );
    }

    #[test]
    fn hit_response_carries_cache_headers() {
        let response = hit_response(b"{}".to_vec(), "resp:/api/posts:u:anon", 60);
        assert_eq!(response.headers()[CACHE_HEADER], "HIT");
        assert_eq!(response.headers()[CACHE_KEY_HEADER], "resp:/api/posts:u:anon");
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "private, max-age=60"
        );
    }
}
