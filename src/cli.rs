//! Command-line interface.
//!
//! Parses arguments, loads configuration, applies flag overrides, and runs
//! the selected command.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigLoader;
use crate::logger::init_logger;
use crate::server::Server;

/// DevMate API server
#[derive(Debug, Parser)]
#[command(name = "devmate-api", version = crate::clap_long_version())]
pub struct Cli {
    /// Path to a single configuration file (skips layered loading)
    #[arg(short, long, global = true, env = "DEVMATE_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Load the configuration, print the effective settings, and exit
    CheckConfig,
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> anyhow::Result<()> {
        let loader = match &self.config_file {
            Some(path) => ConfigLoader::with_file(path.clone()),
            None => ConfigLoader::new()?,
        };
        let mut settings = loader.load()?;

        match self.command {
            Command::Serve {
                host,
                port,
                log_level,
            } => {
                if let Some(host) = host {
                    settings.server.host = host;
                }
                if let Some(port) = port {
                    settings.server.port = port;
                }
                if let Some(level) = log_level {
                    settings.logger.level = level;
                }

                init_logger(&settings.logger)?;
                Server::new(settings).run().await
            }
            Command::CheckConfig => {
                // Settings serialize cleanly; secrets are the caller's
                // responsibility when sharing the output.
                println!("{}", render_settings(&settings)?);
                Ok(())
            }
        }
    }
}

fn render_settings(settings: &crate::config::Settings) -> anyhow::Result<String> {
    serde_json::to_string_pretty(settings).map_err(Into::into)
}
