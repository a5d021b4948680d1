#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! HTTP backend serving the health score.
//!
//! Layout:
//! - `config.rs`: environment-driven settings
//! - `store.rs`: clamped score storage and assessment history with optional file persistence
//! - `quiz.rs`: questionnaire scoring
//! - `state.rs`: shared handler dependencies
//! - `http/`: router, handlers, auth, and metrics middleware

pub mod config;
pub mod error;
pub mod http;
pub mod quiz;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, AppResult, ConfigError, StoreError};
pub use http::router::ApiServer;
pub use quiz::QuizError;
pub use state::ApiState;
pub use store::ScoreStore;

use healthgauge_telemetry::{LoggingConfig, Metrics, init_logging};
use tracing::info;

/// Load configuration, install logging, and serve until shutdown.
///
/// # Errors
///
/// Returns an error when configuration, logging, storage, or the listener fails.
pub async fn run() -> AppResult<()> {
    let config = ServerConfig::from_env()?;
    init_logging(&LoggingConfig {
        level: &config.log_level,
        format: config.log_format,
        ..LoggingConfig::default()
    })
    .map_err(|err| AppError::telemetry("logging.init", err))?;

    serve(config).await
}

/// Serve the score API with an already-loaded configuration.
///
/// # Errors
///
/// Returns an error when storage, metrics, or the listener fails.
pub async fn serve(config: ServerConfig) -> AppResult<()> {
    let store = match &config.store_path {
        Some(path) => ScoreStore::open(path, config.initial_score)
            .await
            .map_err(|err| AppError::store("store.open", err))?,
        None => ScoreStore::in_memory(config.initial_score),
    };
    let telemetry = Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    telemetry.set_health_score(store.current().await);

    info!(
        bind = %config.bind,
        persisted = config.store_path.is_some(),
        auth = config.api_key.is_some(),
        "starting healthgauge server"
    );
    let state = ApiState::new(store, telemetry, config.api_key.clone());
    ApiServer::new(state).serve(config.bind).await
}
