//! Shared state handed to every handler.

use healthgauge_telemetry::Metrics;

use crate::store::ScoreStore;

/// Dependencies shared across request handlers.
pub struct ApiState {
    pub(crate) store: ScoreStore,
    pub(crate) telemetry: Metrics,
    pub(crate) api_key: Option<String>,
}

impl ApiState {
    /// Bundle the store, metrics, and optional API key.
    #[must_use]
    pub const fn new(store: ScoreStore, telemetry: Metrics, api_key: Option<String>) -> Self {
        Self {
            store,
            telemetry,
            api_key,
        }
    }

    /// Whether the presented key satisfies the configured one.
    pub(crate) fn accepts_key(&self, presented: Option<&str>) -> bool {
        match &self.api_key {
            None => true,
            Some(expected) => presented.is_some_and(|key| key == expected),
        }
    }
}
