//! NoOp cache backend.
//!
//! Used when caching is disabled. All operations succeed and store nothing.

use async_trait::async_trait;

use crate::cache::{CacheError, CacheStore};

/// A no-operation cache that doesn't store anything.
///
/// Used when `cache.enabled = false` in configuration.
pub struct NoOpStore;

impl NoOpStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for NoOpStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl_seconds: u64) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
        Ok(0)
    }

    fn is_connected(&self) -> bool {
        true
    }
}
