//! CacheStore trait definition.

use async_trait::async_trait;

use crate::cache::CacheError;

/// Server-side information reported by a cache backend, surfaced by the
/// `/cache-stats` endpoint.
#[derive(Debug, Clone, Default)]
pub struct StoreInfo {
    /// Human-readable memory usage (e.g. Redis `used_memory_human`).
    pub memory_usage: Option<String>,
    /// Number of live keys in the store.
    pub keys: Option<u64>,
}

/// Trait for cache operations.
///
/// All cache backends must implement this trait to provide a unified
/// interface. Implementations are expected to fail soft on connectivity
/// loss: an unreachable store returns [`CacheError::Disconnected`] without
/// attempting network I/O.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value from the cache. `Ok(None)` means not found, which is
    /// distinct from an empty stored value.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Set a value in the cache with the given TTL in seconds.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Remove a single key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every key matching a glob-style pattern in one batch.
    /// Returns the number of keys deleted; a pattern matching zero keys is
    /// a successful no-op.
    async fn remove_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Current connection health. In-process backends are always connected.
    fn is_connected(&self) -> bool;

    /// Backend-level statistics, if the store exposes any.
    async fn server_info(&self) -> Result<Option<StoreInfo>, CacheError> {
        Ok(None)
    }
}
