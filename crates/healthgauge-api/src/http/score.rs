//! Score read, overwrite, assessment, history, and quiz handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use healthgauge_core::{
    AssessmentRequest, HealthScoreResponse, HistoryResponse, QuizRequest, Severity,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::http::errors::ApiError;
use crate::quiz;
use crate::state::ApiState;

const UNKNOWN_SEVERITY: &str = "unknown";

/// Body accepted when overwriting the score; any number is normalized.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreUpdate {
    pub(crate) health_score: f64,
}

pub(crate) async fn get_health_score(
    State(state): State<Arc<ApiState>>,
) -> Json<HealthScoreResponse> {
    let health_score = state.store.current().await;
    state.telemetry.set_health_score(health_score);
    Json(HealthScoreResponse { health_score })
}

pub(crate) async fn put_health_score(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<ScoreUpdate>, JsonRejection>,
) -> Result<Json<HealthScoreResponse>, ApiError> {
    let Json(update) = body.map_err(|rejection| {
        warn!(error = %rejection, "rejected score update body");
        ApiError::bad_request("invalid score update")
    })?;

    let health_score = state
        .store
        .set(update.health_score)
        .await
        .map_err(store_failure)?;
    state.telemetry.set_health_score(health_score);
    info!(requested = update.health_score, health_score, "health score replaced");
    Ok(Json(HealthScoreResponse { health_score }))
}

pub(crate) async fn post_assessment(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Result<Json<HealthScoreResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!(error = %rejection, "rejected assessment body");
        ApiError::bad_request("invalid assessment")
    })?;

    let severity = Severity::parse(&request.severity);
    let label = severity.map_or(UNKNOWN_SEVERITY, Severity::as_str);
    let health_score = state
        .store
        .apply_assessment(severity)
        .await
        .map_err(store_failure)?;
    state.telemetry.inc_assessment(label);
    state.telemetry.set_health_score(health_score);
    info!(severity = label, health_score, "assessment applied");
    Ok(Json(HealthScoreResponse { health_score }))
}

pub(crate) async fn list_assessments(State(state): State<Arc<ApiState>>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        records: state.store.records().await,
    })
}

pub(crate) async fn post_quiz(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<HealthScoreResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!(error = %rejection, "rejected quiz body");
        ApiError::bad_request("invalid quiz submission")
    })?;

    let total = quiz::total_score(&request.answers).map_err(|err| {
        warn!(error = %err, detail = ?err, "quiz submission refused");
        ApiError::bad_request(err.to_string())
    })?;
    let health_score = state.store.set(total).await.map_err(store_failure)?;
    state.telemetry.set_health_score(health_score);
    info!(total, health_score, "quiz scored");
    Ok(Json(HealthScoreResponse { health_score }))
}

fn store_failure(err: StoreError) -> ApiError {
    error!(error = %err, "failed to persist health score");
    ApiError::internal("failed to persist health score")
}
