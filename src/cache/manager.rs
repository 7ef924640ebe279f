//! Cache manager that dispatches to the configured backend.

use std::sync::Arc;

use crate::cache::memory::MemoryStore;
use crate::cache::noop::NoOpStore;
use crate::cache::redis::RedisStore;
use crate::cache::{CacheError, CacheStore, StoreInfo};
use crate::config::settings::{CacheBackend, CacheConfig};

/// Cache manager that provides access to the configured cache backend.
///
/// Constructed once at startup and handed to the monitor; cloning is cheap
/// since the backend is behind an Arc.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl CacheManager {
    /// Create a new cache manager with the given configuration.
    ///
    /// If caching is disabled, a NoOpStore is used.
    pub async fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let backend: Arc<dyn CacheStore> = if !config.enabled {
            Arc::new(NoOpStore::new())
        } else {
            match config.backend {
                CacheBackend::Memory => Arc::new(MemoryStore::new(&config.memory)),
                CacheBackend::Redis => Arc::new(RedisStore::connect(&config.redis).await?),
            }
        };

        Ok(Self { backend, config })
    }

    /// Build a manager around an already-constructed backend. Used by tests
    /// to inject a memory store without going through configuration.
    pub fn with_backend(backend: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    // ========================================================================
    // CacheStore proxy methods
    // ========================================================================

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.backend.get(key).await
    }

    pub async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), CacheError> {
        self.backend.set(key, value, ttl_seconds).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.backend.remove(key).await
    }

    pub async fn remove_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        self.backend.remove_pattern(pattern).await
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_connected()
    }

    pub async fn server_info(&self) -> Result<Option<StoreInfo>, CacheError> {
        self.backend.server_info().await
    }
}
