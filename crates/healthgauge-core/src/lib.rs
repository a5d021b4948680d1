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

//! DOM-free building blocks for the health gauge.
//!
//! Layout:
//! - `api.rs`: wire DTOs, routes, and element identifiers shared by every surface
//! - `score.rs`: the raw `health_score` value and its browser-style coercions
//! - `gauge.rs`: rotation math and CSS formatting
//! - `target.rs`: the rendering seam plus the in-memory gauge model
//! - `source.rs`: the score source seam
//! - `updater.rs`: the single-shot refresh operation

pub mod api;
pub mod error;
pub mod gauge;
pub mod score;
pub mod source;
pub mod target;
pub mod updater;

pub use api::{
    AssessmentRecord, AssessmentRequest, GAUGE_FILL_ID, GAUGE_VALUE_ID, HEALTH_SCORE_FIELD,
    HEALTH_SCORE_PATH, HealthScoreResponse, HistoryResponse, QuizRequest, Severity,
};
pub use error::FetchError;
pub use gauge::{GaugeReading, fill_transform, format_css_number, rotation_degrees};
pub use score::ScoreValue;
pub use source::ScoreSource;
pub use target::{GaugeModel, GaugeTarget};
pub use updater::{GaugeUpdater, RefreshOutcome};
