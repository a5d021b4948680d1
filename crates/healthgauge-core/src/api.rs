//! Shared HTTP DTOs, routes, and DOM identifiers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Route serving the current health score.
pub const HEALTH_SCORE_PATH: &str = "/api/health-score";
/// Route accepting triage assessments that adjust the score.
pub const ASSESSMENTS_PATH: &str = "/api/assessments";
/// Route scoring a completed questionnaire.
pub const QUIZ_PATH: &str = "/api/quiz";
/// Number of answers a questionnaire must carry.
pub const QUIZ_ANSWER_COUNT: usize = 10;
/// Most recent assessment records kept in history.
pub const HISTORY_LIMIT: usize = 20;
/// JSON field carrying the score in response bodies.
pub const HEALTH_SCORE_FIELD: &str = "health_score";
/// Element holding the numeric label.
pub const GAUGE_VALUE_ID: &str = "gaugeValue";
/// Element whose rotation drives the semicircular fill.
pub const GAUGE_FILL_ID: &str = "gaugeFill";
/// Header carrying the optional API key.
pub const HEADER_API_KEY: &str = "x-healthgauge-api-key";
/// Header carrying the request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Body returned by the score endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScoreResponse {
    /// Score clamped to `0..=100`.
    pub health_score: u8,
}

/// Body accepted by the assessments endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// Severity label; unknown labels leave the score unchanged.
    pub severity: String,
}

/// Body accepted by the quiz endpoint.
///
/// Answers stay loosely typed; numbers and numeric strings are both accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizRequest {
    /// One entry per question.
    pub answers: Vec<Value>,
}

/// One applied assessment as kept in the history file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    /// Severity label that was applied.
    #[serde(default)]
    pub severity: String,
    /// Score after the adjustment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<u8>,
    /// Fields written by other tools, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssessmentRecord {
    /// Record for a severity that moved the score to `health_score`.
    #[must_use]
    pub fn new(severity: Severity, health_score: u8) -> Self {
        Self {
            severity: severity.as_str().to_string(),
            health_score: Some(health_score),
            extra: Map::new(),
        }
    }
}

/// Body returned when listing assessment history, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Retained records.
    pub records: Vec<AssessmentRecord>,
}

/// Triage severity reported by an assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Nothing concerning; the score improves.
    Normal,
    /// Minor symptoms.
    Mild,
    /// Symptoms needing attention.
    Serious,
}

impl Severity {
    /// Parse a severity label as sent over the wire.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "normal" => Some(Self::Normal),
            "mild" => Some(Self::Mild),
            "serious" => Some(Self::Serious),
            _ => None,
        }
    }

    /// Wire label for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Mild => "mild",
            Self::Serious => "serious",
        }
    }

    /// Signed adjustment applied to the stored score.
    #[must_use]
    pub const fn delta(self) -> i16 {
        match self {
            Self::Normal => 15,
            Self::Mild => -5,
            Self::Serious => -15,
        }
    }
}
