//! # Design
//!
//! - Centralize server-level errors for configuration, storage, and bootstrap.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for server bootstrap.
pub type AppResult<T> = Result<T, AppError>;

/// Environment configuration could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid environment configuration")]
    InvalidValue {
        /// Name of the offending variable.
        name: &'static str,
        /// Raw value as found in the environment.
        value: String,
    },
}

/// Failures while loading or persisting the score file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the score file failed.
    #[error("score store io failure")]
    Io {
        /// Operation that failed.
        operation: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The score file did not hold valid JSON.
    #[error("score store json failure")]
    Json {
        /// Operation that failed.
        operation: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Source configuration error.
        #[from]
        source: ConfigError,
    },
    /// The score store could not be opened.
    #[error("score store operation failed")]
    Store {
        /// Operation identifier.
        operation: &'static str,
        /// Source store error.
        source: StoreError,
    },
    /// Telemetry could not be installed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: healthgauge_telemetry::TelemetryError,
    },
    /// Binding or serving the HTTP listener failed.
    #[error("http server operation failed")]
    Server {
        /// Operation identifier.
        operation: &'static str,
        /// Address in use.
        addr: SocketAddr,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl AppError {
    pub(crate) const fn store(operation: &'static str, source: StoreError) -> Self {
        Self::Store { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: healthgauge_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }
}
