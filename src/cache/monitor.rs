//! Hit/miss instrumentation over the cache manager.
//!
//! The monitor is purely additive: it delegates every operation to the
//! manager, counts the outcome, and converts failures into their fail-soft
//! results so callers never see a cache error. A short-circuited operation
//! against a disconnected store is not an error, only the health endpoints
//! reflect the outage.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use utoipa::ToSchema;

use crate::cache::{CacheError, CacheManager, StoreInfo};

/// Snapshot of the monitor counters.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub errors: u64,
    /// `hits / (hits + misses) * 100`, two decimal places; `"0%"` when no
    /// gets have been recorded.
    pub hit_rate: String,
}

/// Cache monitor wrapping the manager with counters.
///
/// Cloning shares the counters; one instance is created at startup and held
/// in the application state.
#[derive(Clone)]
pub struct CacheMonitor {
    manager: CacheManager,
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    errors: AtomicU64,
}

impl CacheMonitor {
    pub fn new(manager: CacheManager) -> Self {
        Self {
            manager,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Fail-soft get. A value counts as a hit, absence as a miss, an
    /// operation error is logged and counted, and all failure paths
    /// collapse to `None`.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.manager.get(key).await {
            Ok(Some(value)) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Ok(None) => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(CacheError::Disconnected) => None,
            Err(e) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key, error = %e, "Cache get failed");
                None
            }
        }
    }

    /// Fail-soft set. Returns whether the value was stored.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> bool {
        match self.manager.set(key, value, ttl_seconds).await {
            Ok(()) => {
                self.counters.sets.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(CacheError::Disconnected) => false,
            Err(e) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key, error = %e, "Cache set failed");
                false
            }
        }
    }

    /// Fail-soft single-key delete.
    pub async fn remove(&self, key: &str) -> bool {
        match self.manager.remove(key).await {
            Ok(()) => true,
            Err(CacheError::Disconnected) => false,
            Err(e) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key, error = %e, "Cache remove failed");
                false
            }
        }
    }

    /// Fail-soft pattern delete. Returns the number of keys removed.
    pub async fn remove_pattern(&self, pattern: &str) -> u64 {
        match self.manager.remove_pattern(pattern).await {
            Ok(count) => count,
            Err(CacheError::Disconnected) => 0,
            Err(e) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(pattern, error = %e, "Cache pattern invalidation failed");
                0
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.manager.is_connected()
    }

    /// Direct access to the uninstrumented manager. The health check uses
    /// this for its synthetic round-trip so probes don't skew the counters.
    pub fn manager(&self) -> &CacheManager {
        &self.manager
    }

    /// Configured default TTL for cached responses.
    pub fn default_ttl(&self) -> u64 {
        self.manager.config().default_ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.manager.is_enabled()
    }

    pub async fn server_info(&self) -> Option<StoreInfo> {
        self.manager.server_info().await.ok().flatten()
    }

    /// Snapshot the counters with the derived hit rate.
    pub fn stats(&self) -> CacheStats {
        let hits = self.counters.hits.load(Ordering::Relaxed);
        let misses = self.counters.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            "0%".to_string()
        } else {
            format!("{:.2}%", hits as f64 / total as f64 * 100.0)
        };

        CacheStats {
            hits,
            misses,
            sets: self.counters.sets.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
            hit_rate,
        }
    }

    /// Operator-triggered counter reset.
    pub fn reset_stats(&self) {
        self.counters.hits.store(0, Ordering::Relaxed);
        self.counters.misses.store(0, Ordering::Relaxed);
        self.counters.sets.store(0, Ordering::Relaxed);
        self.counters.errors.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::cache::memory::MemoryStore;
    use crate::cache::{CacheError, CacheStore};
    use crate::config::settings::{CacheConfig, MemoryCacheConfig};

    fn memory_monitor() -> CacheMonitor {
        let backend = Arc::new(MemoryStore::new(&MemoryCacheConfig::default()));
        CacheMonitor::new(CacheManager::with_backend(backend, CacheConfig::default()))
    }

    /// Backend that pretends the store is unreachable.
    struct DisconnectedStore;

    #[async_trait]
    impl CacheStore for DisconnectedStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Disconnected)
        }
        async fn set(&self, _key: &str, _v: Vec<u8>, _ttl: u64) -> Result<(), CacheError> {
            Err(CacheError::Disconnected)
        }
        async fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Disconnected)
        }
        async fn remove_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
            Err(CacheError::Disconnected)
        }
        fn is_connected(&self) -> bool {
            false
        }
    }

    /// Backend whose operations fail with a store-level error.
    struct FailingStore;

    #[async_trait]
    impl CacheStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Operation("boom".into()))
        }
        async fn set(&self, _key: &str, _v: Vec<u8>, _ttl: u64) -> Result<(), CacheError> {
            Err(CacheError::Operation("boom".into()))
        }
        async fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Operation("boom".into()))
        }
        async fn remove_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
            Err(CacheError::Operation("boom".into()))
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn counts_hits_and_misses() {
        let monitor = memory_monitor();
        monitor.set("k", b"v".to_vec(), 60).await;

        assert!(monitor.get("k").await.is_some());
        assert!(monitor.get("k").await.is_some());
        assert!(monitor.get("absent").await.is_none());

        let stats = monitor.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.hit_rate, "66.67%");
    }

    #[tokio::test]
    async fn hit_rate_is_zero_without_traffic() {
        let monitor = memory_monitor();
        assert_eq!(monitor.stats().hit_rate, "0%");
    }

    #[tokio::test]
    async fn operation_errors_are_counted_and_swallowed() {
        let monitor = CacheMonitor::new(CacheManager::with_backend(
            Arc::new(FailingStore),
            CacheConfig::default(),
        ));

        assert!(monitor.get("k").await.is_none());
        assert!(!monitor.set("k", b"v".to_vec(), 60).await);
        assert_eq!(monitor.remove_pattern("resp:*").await, 0);

        assert_eq!(monitor.stats().errors, 3);
    }

    #[tokio::test]
    async fn disconnected_store_does_not_count_errors() {
        let monitor = CacheMonitor::new(CacheManager::with_backend(
            Arc::new(DisconnectedStore),
            CacheConfig::default(),
        ));

        assert!(monitor.get("k").await.is_none());
        assert!(!monitor.set("k", b"v".to_vec(), 60).await);
        assert!(!monitor.remove("k").await);
        assert_eq!(monitor.remove_pattern("resp:*").await, 0);

        let stats = monitor.stats();
        assert_eq!(stats.errors, 0);
        assert!(!monitor.is_connected());
    }

    #[tokio::test]
    async fn reset_clears_counters() {
        let monitor = memory_monitor();
        monitor.set("k", b"v".to_vec(), 60).await;
        monitor.get("k").await;
        monitor.reset_stats();

        let stats = monitor.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.sets, 0);
        assert_eq!(stats.hit_rate, "0%");
    }

    #[tokio::test]
    async fn pattern_with_no_matches_leaves_error_count_alone() {
        let monitor = memory_monitor();
        assert_eq!(monitor.remove_pattern("resp:none:*").await, 0);
        assert_eq!(monitor.stats().errors, 0);
    }
}
