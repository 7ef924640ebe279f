//! Configuration settings structures for devmate-api
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::LoggerConfig;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "devmate-api".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_max_size() -> usize {
    1000
}

fn default_redis_host() -> String {
    "127.0.0.1".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_redis_pool_size() -> u32 {
    4
}

fn default_redis_connection_timeout() -> u64 {
    5
}

fn default_redis_ping_interval() -> u64 {
    5
}

fn default_redis_key_prefix() -> String {
    "devmate".to_string()
}

fn default_jwt_secret() -> String {
    String::new()
}

fn default_access_token_expiration() -> i64 {
    24 // hours
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl ServerConfig {
    /// Full bind address (`host:port`)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

// ============================================================================
// Auth Configuration
// ============================================================================

/// JWT authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key used to sign and validate tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token validity in hours
    #[serde(default = "default_access_token_expiration")]
    pub access_token_expiration: i64,
}

impl AuthConfig {
    /// Validate that a usable secret is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::validation(
                "auth.jwt_secret",
                "JWT secret must not be empty",
            ));
        }
        if self.jwt_secret.len() < 32 {
            return Err(ConfigError::validation(
                "auth.jwt_secret",
                "JWT secret must be at least 32 characters",
            ));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_expiration: default_access_token_expiration(),
        }
    }
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// Cache backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
}

/// Memory cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries in the cache
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_size: default_cache_max_size(),
        }
    }
}

/// Redis cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Full connection URL. Takes precedence over host/port/password.
    #[serde(default)]
    pub url: Option<String>,

    /// Redis host
    #[serde(default = "default_redis_host")]
    pub host: String,

    /// Redis port
    #[serde(default = "default_redis_port")]
    pub port: u16,

    /// Optional password
    #[serde(default)]
    pub password: Option<String>,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_redis_connection_timeout")]
    pub connection_timeout: u64,

    /// Seconds between connection-health PINGs
    #[serde(default = "default_redis_ping_interval")]
    pub ping_interval: u64,

    /// Key prefix for all cache entries
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
}

impl RedisCacheConfig {
    /// Resolve the connection URL: explicit `url` wins, otherwise one is
    /// assembled from the discrete host/port/password fields.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        match &self.password {
            Some(password) => format!("redis://:{}@{}:{}", password, self.host, self.port),
            None => format!("redis://{}:{}", self.host, self.port),
        }
    }

    /// Apply the conventional `REDIS_*` environment variables on top of the
    /// loaded settings. `REDIS_URL` is preferred; the discrete variables are
    /// the fallback. Consumed once at process start.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("REDIS_URL") {
            self.url = Some(url);
            return;
        }
        if let Ok(host) = std::env::var("REDIS_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("REDIS_PORT")
            && let Ok(port) = port.parse()
        {
            self.port = port;
        }
        if let Ok(password) = std::env::var("REDIS_PASSWORD") {
            self.password = Some(password);
        }
    }
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_redis_host(),
            port: default_redis_port(),
            password: None,
            pool_size: default_redis_pool_size(),
            connection_timeout: default_redis_connection_timeout(),
            ping_interval: default_redis_ping_interval(),
            key_prefix: default_redis_key_prefix(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Cache backend type
    #[serde(default)]
    pub backend: CacheBackend,

    /// Default TTL in seconds for cached responses
    #[serde(default = "default_cache_ttl")]
    pub default_ttl: u64,

    /// Memory cache settings
    #[serde(default)]
    pub memory: MemoryCacheConfig,

    /// Redis cache settings
    #[serde(default)]
    pub redis: RedisCacheConfig,
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            backend: CacheBackend::default(),
            default_ttl: default_cache_ttl(),
            memory: MemoryCacheConfig::default(),
            redis: RedisCacheConfig::default(),
        }
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_complete() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.cache.default_ttl, 300);
        assert!(settings.cache.enabled);
        assert_eq!(settings.cache.backend, CacheBackend::Redis);
    }

    #[test]
    fn server_address_joins_host_and_port() {
        let server = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(server.address(), "0.0.0.0:8080");
    }

    #[test]
    fn redis_url_wins_over_discrete_fields() {
        let config = RedisCacheConfig {
            url: Some("redis://example:6380".to_string()),
            host: "ignored".to_string(),
            ..Default::default()
        };
        assert_eq!(config.connection_url(), "redis://example:6380");
    }

    #[test]
    fn redis_url_built_from_parts() {
        let config = RedisCacheConfig {
            password: Some("s3cret".to_string()),
            ..Default::default()
        };
        assert_eq!(config.connection_url(), "redis://:s3cret@127.0.0.1:6379");

        let no_password = RedisCacheConfig::default();
        assert_eq!(no_password.connection_url(), "redis://127.0.0.1:6379");
    }

    #[test]
    fn auth_validation_rejects_short_secret() {
        let auth = AuthConfig {
            jwt_secret: "short".to_string(),
            ..Default::default()
        };
        assert!(auth.validate().is_err());

        let ok = AuthConfig {
            jwt_secret: "a".repeat(32),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn cache_backend_parses_from_toml() {
        let config: CacheConfig = toml::from_str("backend = \"memory\"").unwrap();
        assert_eq!(config.backend, CacheBackend::Memory);
    }
}
