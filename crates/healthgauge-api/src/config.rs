//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use healthgauge_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};

use crate::error::ConfigError;

const ENV_BIND: &str = "HEALTHGAUGE_BIND";
const ENV_STORE_PATH: &str = "HEALTHGAUGE_STORE_PATH";
const ENV_API_KEY: &str = "HEALTHGAUGE_API_KEY";
const ENV_INITIAL_SCORE: &str = "HEALTHGAUGE_INITIAL_SCORE";
const ENV_LOG_LEVEL: &str = "HEALTHGAUGE_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "HEALTHGAUGE_LOG_FORMAT";
const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Settings for the score server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listener address.
    pub bind: SocketAddr,
    /// Optional JSON file backing the score.
    pub store_path: Option<PathBuf>,
    /// When set, score routes require this key in `x-healthgauge-api-key`.
    pub api_key: Option<String>,
    /// Score used when no stored value exists.
    pub initial_score: u8,
    /// Log level passed to the subscriber.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_raw = read(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                name: ENV_BIND,
                value: bind_raw.clone(),
            })?;

        let initial_score = match read(ENV_INITIAL_SCORE) {
            Some(raw) => raw
                .parse::<u8>()
                .ok()
                .filter(|score| *score <= 100)
                .ok_or(ConfigError::InvalidValue {
                    name: ENV_INITIAL_SCORE,
                    value: raw,
                })?,
            None => 0,
        };

        Ok(Self {
            bind,
            store_path: read(ENV_STORE_PATH).map(PathBuf::from),
            api_key: read(ENV_API_KEY),
            initial_score,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format: read(ENV_LOG_FORMAT).map_or_else(LogFormat::infer, |label| {
                LogFormat::from_label(&label)
            }),
        })
    }
}
