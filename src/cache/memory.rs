//! In-process cache backend with per-entry TTL.
//!
//! Used for tests and single-instance deployments that have no Redis. Unlike
//! the Redis backend this store is always connected, so it never exercises
//! the fail-soft path.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use regex::Regex;

use crate::cache::{CacheError, CacheStore, StoreInfo};
use crate::config::settings::MemoryCacheConfig;

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// DashMap-backed cache with lazy expiry on read, bounded by `max_size`:
/// writes to a full store of live entries are dropped.
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    max_size: usize,
}

impl MemoryStore {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_size: config.max_size,
        }
    }

    /// Translate a glob-style key pattern (`*` wildcard) into an anchored
    /// regex. Everything except `*` is matched literally.
    fn pattern_regex(pattern: &str) -> Result<Regex, CacheError> {
        let escaped = regex::escape(pattern).replace(r"\*", ".*");
        Regex::new(&format!("^{escaped}$"))
            .map_err(|e| CacheError::InvalidPattern(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Ok(Some(entry.value.clone()));
            }
            drop(entry);
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), CacheError> {
        if self.entries.len() >= self.max_size && !self.entries.contains_key(key) {
            // Sweep expired entries first; if the store is still full the
            // insert is refused. The store is bounded, not LRU, and a
            // refused write is only a lost optimization.
            let now = Instant::now();
            self.entries.retain(|_, entry| entry.expires_at > now);
            if self.entries.len() >= self.max_size {
                return Ok(());
            }
        }
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn remove_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let matcher = Self::pattern_regex(pattern)?;
        let before = self.entries.len();
        self.entries.retain(|key, _| !matcher.is_match(key));
        Ok((before - self.entries.len()) as u64)
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn server_info(&self) -> Result<Option<StoreInfo>, CacheError> {
        Ok(Some(StoreInfo {
            memory_usage: None,
            keys: Some(self.entries.len() as u64),
        }))
    }
}
