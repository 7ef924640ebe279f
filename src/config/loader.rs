//! Configuration loader for devmate-api
//!
//! Loads settings from layered TOML files and environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "DEVMATE_CONFIG_DIR";

/// Environment variable for a single specific configuration file
const CONFIG_FILE_ENV: &str = "DEVMATE_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "DEVMATE";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
///
/// Sources, in order of priority (lowest to highest):
/// 1. `default.toml` - Base default configuration (optional)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local development overrides (optional)
/// 4. `DEVMATE_*` environment variables
/// 5. `REDIS_URL` / `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD`
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration directory path
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    /// Current application environment
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader from the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        Ok(Self {
            config_dir,
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Create a loader for a single explicit configuration file.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// The environment this loader resolves environment-specific files for.
    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and deserialize the complete settings.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();

        if let Some(file) = &self.config_file {
            if !file.exists() {
                return Err(ConfigError::file_not_found(file.display().to_string()));
            }
            builder = builder.add_source(Self::file_source(file, true));
        } else {
            builder = builder
                .add_source(Self::file_source(&self.config_dir.join("default.toml"), false))
                .add_source(Self::file_source(
                    &self
                        .config_dir
                        .join(format!("{}.toml", self.environment.as_str())),
                    false,
                ))
                .add_source(Self::file_source(&self.config_dir.join("local.toml"), false));
        }

        // DEVMATE_* environment variables, `__` separates nested keys
        // (e.g. DEVMATE_SERVER__PORT=8080)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR),
        );

        let mut settings: Settings = builder.build()?.try_deserialize()?;

        // Conventional Redis variables take precedence over everything.
        settings.cache.redis.apply_env();

        Ok(settings)
    }

    fn file_source(path: &Path, required: bool) -> File<config::FileSourceFile, FileFormat> {
        File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_explicit_file_is_an_error() {
        let loader = ConfigLoader::with_file("/nonexistent/devmate.toml");
        assert!(matches!(loader.load(), Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[cache]\nenabled = false\nbackend = \"memory\""
        )
        .unwrap();

        let loader = ConfigLoader::with_file(file.path());
        let settings = loader.load().unwrap();
        assert_eq!(settings.server.port, 9000);
        assert!(!settings.cache.enabled);
    }

    #[test]
    fn absent_layered_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader {
            config_dir: dir.path().to_path_buf(),
            config_file: None,
            environment: AppEnvironment::Test,
        };
        let settings = loader.load().unwrap();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.cache.default_ttl, 300);
    }
}
