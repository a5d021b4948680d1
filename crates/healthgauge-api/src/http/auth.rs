//! API key guard for the score routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use healthgauge_core::api::HEADER_API_KEY;
use tracing::warn;

use crate::http::errors::ApiError;
use crate::state::ApiState;

pub(crate) async fn require_api_key(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(HEADER_API_KEY)
        .and_then(|value| value.to_str().ok());

    if !state.accepts_key(presented) {
        warn!(
            route = %req.uri().path(),
            key_present = presented.is_some(),
            "rejected request without a valid API key"
        );
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(req).await)
}
