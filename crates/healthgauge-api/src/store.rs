//! Score storage with optional JSON file persistence.
//!
//! # Design
//! - Scores are always stored as integers in `0..=100`; every write normalizes.
//! - Rounding uses ties-to-even so `2.5` becomes `2`.
//! - Writes hold the lock across the file write so persisted order matches memory.
//! - The file keeps `health_score`, the last `HISTORY_LIMIT` assessment records,
//!   and any other top-level fields it already had.

use std::path::{Path, PathBuf};

use healthgauge_core::api::HISTORY_LIMIT;
use healthgauge_core::{AssessmentRecord, HEALTH_SCORE_FIELD, Severity};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;

const RECORDS_FIELD: &str = "records";

/// Round and clamp an arbitrary number into a stored score.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round_ties_even().clamp(0.0, 100.0) as u8
}

/// Apply an assessment's adjustment to a score.
#[must_use]
pub fn adjust_score(current: u8, severity: Option<Severity>) -> u8 {
    let Some(severity) = severity else {
        return current;
    };
    let adjusted = (i16::from(current) + severity.delta()).clamp(0, 100);
    u8::try_from(adjusted).unwrap_or(current)
}

/// Holds the current score and assessment history, mirroring both to disk
/// when configured.
#[derive(Debug)]
pub struct ScoreStore {
    history: RwLock<History>,
    path: Option<PathBuf>,
}

/// Everything kept in the history file. Unrecognised top-level fields ride
/// along in `extra` so rewrites never drop them.
#[derive(Clone, Debug, Default)]
struct History {
    score: u8,
    records: Vec<AssessmentRecord>,
    extra: Map<String, Value>,
}

#[derive(Serialize)]
struct HistoryFile<'a> {
    health_score: u8,
    records: &'a [AssessmentRecord],
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl History {
    fn starting_at(score: u8) -> Self {
        Self {
            score: score.min(100),
            ..Self::default()
        }
    }

    fn push_record(&mut self, record: AssessmentRecord) {
        self.records.push(record);
        if self.records.len() > HISTORY_LIMIT {
            let excess = self.records.len() - HISTORY_LIMIT;
            self.records.drain(..excess);
        }
    }
}

impl ScoreStore {
    /// Store kept only in memory.
    #[must_use]
    pub fn in_memory(initial: u8) -> Self {
        Self {
            history: RwLock::new(History::starting_at(initial)),
            path: None,
        }
    }

    /// Open a file-backed store, creating the file with `initial` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, parsed, or created.
    pub async fn open(path: impl Into<PathBuf>, initial: u8) -> Result<Self, StoreError> {
        let path = path.into();
        let history = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let history = decode_history(&path, &bytes)?;
                debug!(
                    path = %path.display(),
                    score = history.score,
                    records = history.records.len(),
                    "loaded stored health score"
                );
                history
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let history = History::starting_at(initial);
                persist(&path, &history).await?;
                info!(path = %path.display(), score = history.score, "created health score file");
                history
            }
            Err(source) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path,
                    source,
                });
            }
        };
        Ok(Self {
            history: RwLock::new(history),
            path: Some(path),
        })
    }

    /// Current score.
    pub async fn current(&self) -> u8 {
        self.history.read().await.score
    }

    /// Retained assessment records, oldest first.
    pub async fn records(&self) -> Vec<AssessmentRecord> {
        self.history.read().await.records.clone()
    }

    /// Replace the score with a normalized value.
    ///
    /// # Errors
    ///
    /// Returns an error when persisting the new value fails.
    pub async fn set(&self, raw: f64) -> Result<u8, StoreError> {
        let mut guard = self.history.write().await;
        let mut next = guard.clone();
        next.score = normalize_score(raw);
        self.write_through(&next).await?;
        *guard = next;
        Ok(guard.score)
    }

    /// Adjust the score for an assessment and record it in history.
    /// Unknown severities leave both untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when persisting the new value fails.
    pub async fn apply_assessment(&self, severity: Option<Severity>) -> Result<u8, StoreError> {
        let mut guard = self.history.write().await;
        let Some(severity) = severity else {
            return Ok(guard.score);
        };
        let mut next = guard.clone();
        next.score = adjust_score(next.score, Some(severity));
        next.push_record(AssessmentRecord::new(severity, next.score));
        self.write_through(&next).await?;
        *guard = next;
        Ok(guard.score)
    }

    async fn write_through(&self, history: &History) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => persist(path, history).await,
            None => Ok(()),
        }
    }
}

fn decode_error(path: &Path, source: serde_json::Error) -> StoreError {
    StoreError::Json {
        operation: "decode",
        path: path.to_path_buf(),
        source,
    }
}

fn decode_history(path: &Path, bytes: &[u8]) -> Result<History, StoreError> {
    let mut document: Map<String, Value> =
        serde_json::from_slice(bytes).map_err(|source| decode_error(path, source))?;
    let raw = document
        .remove(HEALTH_SCORE_FIELD)
        .as_ref()
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let mut records: Vec<AssessmentRecord> = match document.remove(RECORDS_FIELD) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value(value).map_err(|source| decode_error(path, source))?,
    };
    if records.len() > HISTORY_LIMIT {
        records.drain(..records.len() - HISTORY_LIMIT);
    }
    Ok(History {
        score: normalize_score(raw),
        records,
        extra: document,
    })
}

async fn persist(path: &Path, history: &History) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(&HistoryFile {
        health_score: history.score,
        records: &history.records,
        extra: &history.extra,
    })
    .map_err(|source| StoreError::Json {
        operation: "encode",
        path: path.to_path_buf(),
        source,
    })?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| StoreError::Io {
            operation: "write",
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn normalize_rounds_and_clamps() {
        assert_eq!(normalize_score(42.4), 42);
        assert_eq!(normalize_score(42.6), 43);
        assert_eq!(normalize_score(2.5), 2);
        assert_eq!(normalize_score(3.5), 4);
        assert_eq!(normalize_score(-12.0), 0);
        assert_eq!(normalize_score(180.0), 100);
        assert_eq!(normalize_score(f64::NAN), 0);
    }

    #[test]
    fn adjustments_follow_severity() {
        assert_eq!(adjust_score(50, Some(Severity::Normal)), 65);
        assert_eq!(adjust_score(95, Some(Severity::Normal)), 100);
        assert_eq!(adjust_score(50, Some(Severity::Mild)), 45);
        assert_eq!(adjust_score(3, Some(Severity::Mild)), 0);
        assert_eq!(adjust_score(50, Some(Severity::Serious)), 35);
        assert_eq!(adjust_score(10, Some(Severity::Serious)), 0);
        assert_eq!(adjust_score(50, None), 50);
    }

    #[tokio::test]
    async fn in_memory_store_updates() -> Result<()> {
        let store = ScoreStore::in_memory(20);
        assert_eq!(store.current().await, 20);
        assert_eq!(store.set(77.7).await?, 78);
        assert_eq!(store.apply_assessment(Some(Severity::Serious)).await?, 63);
        assert_eq!(store.current().await, 63);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_created_with_initial_score() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("history.json");

        let store = ScoreStore::open(&path, 12).await?;

        assert_eq!(store.current().await, 12);
        let written: Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
        assert_eq!(written, serde_json::json!({ "health_score": 12, "records": [] }));
        Ok(())
    }

    #[tokio::test]
    async fn stored_values_are_normalized_on_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("score.json");
        tokio::fs::write(&path, br#"{ "health_score": 140.2, "records": [] }"#).await?;

        let store = ScoreStore::open(&path, 0).await?;

        assert_eq!(store.current().await, 100);
        Ok(())
    }

    #[tokio::test]
    async fn writes_are_persisted() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("score.json");
        let store = ScoreStore::open(&path, 50).await?;

        store.apply_assessment(Some(Severity::Normal)).await?;

        let reopened = ScoreStore::open(&path, 0).await?;
        assert_eq!(reopened.current().await, 65);
        Ok(())
    }

    #[tokio::test]
    async fn rewrites_keep_existing_records_and_fields() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("history.json");
        let existing = serde_json::json!({
            "health_score": 50,
            "owner": "clinic",
            "records": [{ "severity": "mild", "date": "2024-03-01" }]
        });
        tokio::fs::write(&path, serde_json::to_vec(&existing)?).await?;
        let store = ScoreStore::open(&path, 0).await?;

        assert_eq!(store.apply_assessment(Some(Severity::Normal)).await?, 65);
        assert_eq!(store.set(40.0).await?, 40);

        let written: Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
        assert_eq!(
            written,
            serde_json::json!({
                "health_score": 40,
                "owner": "clinic",
                "records": [
                    { "severity": "mild", "date": "2024-03-01" },
                    { "severity": "normal", "health_score": 65 }
                ]
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn history_keeps_latest_records_only() -> Result<()> {
        let store = ScoreStore::in_memory(50);
        for _ in 0..HISTORY_LIMIT {
            store.apply_assessment(Some(Severity::Mild)).await?;
        }
        for _ in 0..5 {
            store.apply_assessment(Some(Severity::Normal)).await?;
        }
        store.apply_assessment(None).await?;

        let records = store.records().await;
        assert_eq!(records.len(), HISTORY_LIMIT);
        assert_eq!(records[0].severity, "mild");
        assert!(records[HISTORY_LIMIT - 5..].iter().all(|record| record.severity == "normal"));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("score.json");
        tokio::fs::write(&path, b"not json").await?;

        let err = ScoreStore::open(&path, 0).await.err();

        assert!(matches!(err, Some(StoreError::Json { operation: "decode", .. })));
        Ok(())
    }
}
