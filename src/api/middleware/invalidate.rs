//! Pattern-based cache invalidation for mutating requests.
//!
//! Configured with a fixed set of key patterns per route group. After a
//! mutating request succeeds (2xx), every pattern is purged in a detached
//! task so the response is never delayed. Invalidation is best-effort:
//! failures are logged by the monitor and never retried within the request.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

/// Key patterns to purge after a successful write.
#[derive(Debug, Clone)]
pub struct InvalidationRules {
    patterns: Arc<Vec<String>>,
}

impl InvalidationRules {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: Arc::new(patterns.into_iter().map(Into::into).collect()),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Invalidation middleware for mutating endpoints.
///
/// GET and HEAD requests pass through untouched; for anything else the
/// configured patterns are deleted if and only if the downstream response
/// status indicates success.
pub async fn invalidate_cache(
    State((state, rules)): State<(AppState, InvalidationRules)>,
    request: Request,
    next: Next,
) -> Response {
    if matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    let response = next.run(request).await;

    if response.status().is_success() {
        let cache = state.cache.clone();
        let rules = rules.clone();
        tokio::spawn(async move {
            for pattern in rules.patterns() {
                let removed = cache.remove_pattern(pattern).await;
                tracing::debug!(pattern, removed, "Invalidated cache entries");
            }
        });
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_keep_configured_patterns() {
        let rules = InvalidationRules::new(["resp:/api/posts*", "resp:/api/users*"]);
        assert_eq!(
            rules.patterns(),
            ["resp:/api/posts*", "resp:/api/users*"]
        );
    }
}
