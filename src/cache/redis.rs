//! Redis cache backend using a bb8 connection pool.
//!
//! Connection health is owned by the store itself: a background watcher task
//! pings the server and flips an atomic flag, and every operation consults
//! that flag before touching the network. While the flag is down, operations
//! short-circuit with [`CacheError::Disconnected`] so the cache degrades to
//! a transparent pass-through instead of failing callers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};
use tokio::time::MissedTickBehavior;

use crate::cache::{CacheError, CacheStore, StoreInfo};
use crate::config::settings::RedisCacheConfig;

type RedisPool = Pool<Client>;

/// Redis-backed cache store.
pub struct RedisStore {
    pool: RedisPool,
    connected: Arc<AtomicBool>,
    key_prefix: String,
}

impl RedisStore {
    /// Build the pool and start the connection watcher.
    ///
    /// Construction succeeds even when the server is unreachable; the store
    /// simply starts in the disconnected state and the watcher brings it up
    /// once the server answers PING.
    pub async fn connect(config: &RedisCacheConfig) -> Result<Self, CacheError> {
        let url = config.connection_url();
        let client = Client::open(url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout))
            .build_unchecked(client);

        // Initial probe so a healthy server is usable before the first
        // watcher tick.
        let connected = Arc::new(AtomicBool::new(ping(&pool).await));

        let store = Self {
            pool,
            connected,
            key_prefix: config.key_prefix.clone(),
        };
        store.spawn_watcher(config.ping_interval);

        Ok(store)
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    async fn get_conn(&self) -> Result<PooledConnection<'_, Client>, CacheError> {
        match self.pool.get().await {
            Ok(conn) => Ok(conn),
            Err(e) => {
                // Losing the pool counts as a connectivity failure, not an
                // operation failure: flip the flag so subsequent calls
                // short-circuit until the watcher observes a recovery.
                self.connected.store(false, Ordering::SeqCst);
                tracing::warn!(error = %e, "Redis connection lost");
                Err(CacheError::Disconnected)
            }
        }
    }

    /// Spawn the background task that drives the connection-state flag.
    fn spawn_watcher(&self, interval_seconds: u64) {
        let pool = self.pool.clone();
        let connected = Arc::clone(&self.connected);

        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let healthy = ping(&pool).await;
                let was_healthy = connected.swap(healthy, Ordering::SeqCst);
                if healthy && !was_healthy {
                    tracing::info!("Redis connection established");
                } else if !healthy && was_healthy {
                    tracing::warn!("Redis connection lost, cache degraded to pass-through");
                }
            }
        });
    }
}

/// One PING round-trip against the pool.
async fn ping(pool: &RedisPool) -> bool {
    match pool.get().await {
        Ok(mut conn) => {
            let conn_ref: &mut MultiplexedConnection = &mut conn;
            redis::cmd("PING")
                .query_async::<String>(conn_ref)
                .await
                .is_ok()
        }
        Err(_) => false,
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        if !self.is_connected() {
            return Err(CacheError::Disconnected);
        }
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .get(&prefixed)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), CacheError> {
        if !self.is_connected() {
            return Err(CacheError::Disconnected);
        }
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .set_ex::<_, _, ()>(&prefixed, value, ttl_seconds)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        if !self.is_connected() {
            return Err(CacheError::Disconnected);
        }
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .del::<_, ()>(&prefixed)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn remove_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        if !self.is_connected() {
            return Err(CacheError::Disconnected);
        }
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(pattern);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&prefixed)
            .query_async(conn_ref)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let count = keys.len() as u64;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .del::<_, ()>(keys)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        Ok(count)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn server_info(&self) -> Result<Option<StoreInfo>, CacheError> {
        if !self.is_connected() {
            return Err(CacheError::Disconnected);
        }
        let mut conn = self.get_conn().await?;

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let info: String = redis::cmd("INFO")
            .arg("memory")
            .query_async(conn_ref)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let keys: u64 = redis::cmd("DBSIZE")
            .query_async(conn_ref)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;

        let memory_usage = info
            .lines()
            .find_map(|line| line.strip_prefix("used_memory_human:"))
            .map(|v| v.trim().to_string());

        Ok(Some(StoreInfo {
            memory_usage,
            keys: Some(keys),
        }))
    }
}
