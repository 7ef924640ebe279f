//! Cache error types.

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache operation failed: {0}")]
    Operation(String),

    #[error("Cache connection failed: {0}")]
    Connection(String),

    /// The store is known to be unreachable; the operation was short-circuited
    /// before any network I/O. The monitor does not count this as an operation
    /// error, only the health endpoints reflect the outage.
    #[error("Cache store disconnected")]
    Disconnected,

    #[error("Invalid key pattern: {0}")]
    InvalidPattern(String),
}
