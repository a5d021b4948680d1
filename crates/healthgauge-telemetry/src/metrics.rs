//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes only the counters and gauges the score service reports.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: std::sync::Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    assessments_total: IntCounterVec,
    health_score: IntGauge,
}

/// Snapshot of the score gauge for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Last score stored by the service.
    pub health_score: i64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "http_requests_total",
            source,
        })?;
        let assessments_total = IntCounterVec::new(
            Opts::new("assessments_total", "Triage assessments applied by severity"),
            &["severity"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "assessments_total",
            source,
        })?;
        let health_score = IntGauge::with_opts(Opts::new(
            "health_score",
            "Health score currently served",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "health_score",
            source,
        })?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "assessments_total", &assessments_total)?;
        register(&registry, "health_score", &health_score)?;

        Ok(Self {
            inner: std::sync::Arc::new(MetricsInner {
                registry,
                http_requests_total,
                assessments_total,
                health_score,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Increment the assessment counter for a severity label.
    pub fn inc_assessment(&self, severity: &str) {
        self.inner
            .assessments_total
            .with_label_values(&[severity])
            .inc();
    }

    /// Set the served score gauge.
    pub fn set_health_score(&self, score: u8) {
        self.inner.health_score.set(i64::from(score));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Capture the current gauge values.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            health_score: self.inner.health_score.get(),
        }
    }
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}
