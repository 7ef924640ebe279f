//! Response cache built on a pluggable key-value store.
//!
//! The cache is an optimization, never a dependency for correctness: every
//! layer degrades to a transparent pass-through (always miss) when the
//! backing store is unreachable.
//!
//! Layers, bottom up:
//! - [`CacheStore`] backends: Redis (bb8 pool, connection watcher), memory
//!   (DashMap with per-entry TTL), no-op (caching disabled).
//! - [`CacheManager`]: backend selection from configuration.
//! - [`CacheMonitor`]: hit/miss/set/error counters plus the fail-soft API
//!   the HTTP middleware consumes.
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! backend = "redis"   # or "memory"
//! default_ttl = 300
//!
//! [cache.memory]
//! max_size = 1000
//!
//! [cache.redis]
//! host = "127.0.0.1"
//! port = 6379
//! pool_size = 4
//! connection_timeout = 5
//! ping_interval = 5
//! key_prefix = "devmate"
//! ```
//!
//! `REDIS_URL` (preferred) or `REDIS_HOST`/`REDIS_PORT`/`REDIS_PASSWORD`
//! override the TOML connection settings at startup.

mod error;
mod manager;
mod memory;
mod monitor;
mod noop;
mod redis;
mod traits;

pub use error::CacheError;
pub use manager::CacheManager;
pub use memory::MemoryStore;
pub use monitor::{CacheMonitor, CacheStats};
pub use traits::{CacheStore, StoreInfo};

// Re-export config types
pub use crate::config::settings::{CacheBackend, CacheConfig, MemoryCacheConfig, RedisCacheConfig};
