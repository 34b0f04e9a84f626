//! Configuration
//!
//! Loads the JSON5 config file. Every field has a default, so a missing file
//! yields a working configuration. Environment variables override the file:
//!
//! - `CHATPOLL_CONFIG_PATH` -- config file location
//! - `CHATPOLL_BIND` / `CHATPOLL_PORT` -- server address
//! - `CHATPOLL_LOG` -- log filter

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::LoggingConfig;

/// Default port for the HTTP server
pub const DEFAULT_PORT: u16 = 18790;

/// Config error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Bind address
    pub bind: String,
    /// Port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Resolve the config file path
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("CHATPOLL_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chatpoll")
        .join("chatpoll.json5")
}

/// Load the config file at `path` without environment overrides
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    json5::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply overrides from a variable lookup (normally the process environment)
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(bind) = lookup("CHATPOLL_BIND") {
        config.server.bind = bind;
    }
    if let Some(port) = lookup("CHATPOLL_PORT") {
        config.server.port = port.parse().map_err(|_| ConfigError::InvalidOverride {
            key: "CHATPOLL_PORT".to_string(),
            value: port.clone(),
        })?;
    }
    if let Some(level) = lookup("CHATPOLL_LOG") {
        config.logging.level = level;
    }
    Ok(())
}

/// Load the effective configuration
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = load_config_file(&get_config_path())?;
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}
