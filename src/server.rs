//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::cache::{CacheManager, CacheMonitor};
use crate::config::{Environment, settings::Settings};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// # Errors
    /// - Cache backend initialization errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %Environment::from_env().as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            request_timeout = %self.settings.server.request_timeout,
            "Server configuration loaded"
        );

        tracing::info!(
            cache_enabled = %self.settings.cache.enabled,
            cache_backend = ?self.settings.cache.backend,
            default_ttl = %self.settings.cache.default_ttl,
            "Cache configuration loaded"
        );

        self.settings.auth.validate().map_err(|e| {
            tracing::error!(error = %e, "Auth configuration validation failed");
            anyhow::anyhow!("Auth configuration validation failed: {}", e)
        })?;

        // Initialize the cache: manager picks the backend, the monitor adds
        // hit/miss instrumentation. A Redis backend that is down at startup
        // still constructs; it stays in pass-through until the server
        // becomes reachable.
        let manager = CacheManager::new(self.settings.cache.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Cache initialization failed: {}", e))?;
        let monitor = CacheMonitor::new(manager);
        tracing::info!(connected = %monitor.is_connected(), "Cache initialized");

        let state = AppState::new(monitor, self.settings.auth.clone());
        tracing::info!("Application state created");

        let router = create_router(state);
        tracing::info!("Router configured");

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
