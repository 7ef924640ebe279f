//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use jiff::Timestamp;

use crate::cache::CacheMonitor;
use crate::config::AuthConfig;
use crate::repositories::Repositories;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since the monitor and repositories use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// Instrumented response cache, constructed once at startup
    pub cache: CacheMonitor,
    /// In-memory data stores
    pub repos: Repositories,
    /// JWT configuration for token validation
    pub auth_config: AuthConfig,
    /// Process start time, reported by the cache-stats endpoint
    pub started_at: Timestamp,
}

impl AppState {
    /// Creates a new AppState from an initialized cache monitor and config.
    pub fn new(cache: CacheMonitor, auth_config: AuthConfig) -> Self {
        Self {
            cache,
            repos: Repositories::seeded(),
            auth_config,
            started_at: Timestamp::now(),
        }
    }

    /// Seconds since the process started.
    pub fn uptime_seconds(&self) -> i64 {
        (Timestamp::now() - self.started_at).get_seconds()
    }
}
