//! Middleware components for request processing.
//!
//! Contains the response-cache and invalidation middleware plus the
//! supporting auth, logging, and request-ID layers.

mod auth;
mod cache;
mod invalidate;
mod logging;
mod request_id;

pub use auth::{AuthUser, optional_auth_middleware, require_auth};
pub use cache::{CACHE_HEADER, CACHE_KEY_HEADER, CachePolicy, cache_response, response_cache_key};
pub use invalidate::{InvalidationRules, invalidate_cache};
pub use logging::logging_middleware;
pub use request_id::{RequestId, request_id_middleware};
