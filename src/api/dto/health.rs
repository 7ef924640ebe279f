//! Health and cache-stats endpoint types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cache::CacheStats;

/// Health status of a single service dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServiceHealth {
    /// Service answered its check
    Healthy,
    /// Service failed its check
    Unhealthy,
    /// No check is wired up for this service
    Unknown,
}

impl ServiceHealth {
    /// Unknown services do not fail the overall health verdict.
    pub fn is_acceptable(self) -> bool {
        !matches!(self, ServiceHealth::Unhealthy)
    }
}

/// Per-service breakdown reported by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServicesStatus {
    pub api: ServiceHealth,
    pub database: ServiceHealth,
    pub redis: ServiceHealth,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when every service is healthy or unknown
    pub status: ServiceHealth,
    /// ISO 8601 timestamp of the check
    pub timestamp: String,
    pub services: ServicesStatus,
}

/// Body of `GET /cache-stats`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CacheStatsResponse {
    pub connected: bool,
    /// Process uptime in seconds
    pub uptime: i64,
    /// Store-reported memory usage, when the backend exposes it
    pub memory_usage: Option<String>,
    pub cache_info: CacheInfo,
}

/// Monitor counters plus store-level key count.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CacheInfo {
    pub enabled: bool,
    pub keys: Option<u64>,
    #[serde(flatten)]
    pub stats: CacheStats,
}
