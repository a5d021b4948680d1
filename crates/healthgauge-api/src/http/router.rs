//! Router construction and server host for the score API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, Request, header::CONTENT_TYPE},
    middleware,
    routing::{get, post},
};
use healthgauge_core::api::{
    ASSESSMENTS_PATH, HEADER_API_KEY, HEADER_REQUEST_ID, HEALTH_SCORE_PATH, QUIZ_PATH,
};
use healthgauge_telemetry::{build_sha, propagate_request_id_layer, set_request_id_layer};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info, warn};

use crate::error::{AppError, AppResult};
use crate::http::auth::require_api_key;
use crate::http::health::{health, metrics};
use crate::http::score::{
    get_health_score, list_assessments, post_assessment, post_quiz, put_health_score,
};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper hosting the score endpoints.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Wire routes and middleware around the shared state.
    #[must_use]
    pub fn new(state: ApiState) -> Self {
        let state = Arc::new(state);
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::PUT, Method::POST, Method::OPTIONS])
            .allow_headers([
                CONTENT_TYPE,
                HeaderName::from_static(HEADER_API_KEY),
                HeaderName::from_static(HEADER_REQUEST_ID),
            ]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(propagate_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(state.telemetry.clone()));

        let router = Self::public_routes()
            .merge(Self::score_routes(&state))
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn public_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
    }

    fn score_routes(state: &Arc<ApiState>) -> Router<Arc<ApiState>> {
        let require_api = middleware::from_fn_with_state(state.clone(), require_api_key);

        Router::new()
            .route(
                HEALTH_SCORE_PATH,
                get(get_health_score)
                    .put(put_health_score)
                    .route_layer(require_api.clone()),
            )
            .route(
                ASSESSMENTS_PATH,
                get(list_assessments)
                    .post(post_assessment)
                    .route_layer(require_api.clone()),
            )
            .route(QUIZ_PATH, post(post_quiz).route_layer(require_api))
    }

    /// Serve until interrupted with ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn serve(self, addr: SocketAddr) -> AppResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| AppError::Server {
                operation: "bind",
                addr,
                source,
            })?;
        info!(%addr, "health score API listening");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|source| AppError::Server {
                operation: "serve",
                addr,
                source,
            })
    }

    #[cfg(test)]
    pub(crate) const fn router(&self) -> &Router {
        &self.router
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ScoreStore;
    use anyhow::Result;
    use axum::body::{Body, to_bytes};
    use axum::http::StatusCode;
    use axum::response::Response;
    use healthgauge_telemetry::Metrics;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn server(initial: u8, api_key: Option<&str>) -> Result<ApiServer> {
        let state = ApiState::new(
            ScoreStore::in_memory(initial),
            Metrics::new()?,
            api_key.map(str::to_string),
        );
        Ok(ApiServer::new(state))
    }

    async fn send(server: &ApiServer, request: Request<Body>) -> Result<Response> {
        Ok(server.router().clone().oneshot(request).await?)
    }

    async fn json_body(response: Response) -> Result<Value> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn get_request(uri: &str) -> Result<Request<Body>> {
        Ok(Request::builder().uri(uri).body(Body::empty())?)
    }

    fn json_request(method: Method, uri: &str, body: &Value) -> Result<Request<Body>> {
        Ok(Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body)?))?)
    }

    #[tokio::test]
    async fn serves_current_score() -> Result<()> {
        let server = server(75, None)?;

        let response = send(&server, get_request(HEALTH_SCORE_PATH)?).await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(HEADER_REQUEST_ID));
        assert_eq!(json_body(response).await?, json!({ "health_score": 75 }));
        Ok(())
    }

    #[tokio::test]
    async fn put_normalizes_the_score() -> Result<()> {
        let server = server(0, None)?;

        let response = send(
            &server,
            json_request(Method::PUT, HEALTH_SCORE_PATH, &json!({ "health_score": 120.4 }))?,
        )
        .await?;
        assert_eq!(json_body(response).await?, json!({ "health_score": 100 }));

        let response = send(
            &server,
            json_request(Method::PUT, HEALTH_SCORE_PATH, &json!({ "health_score": 62.5 }))?,
        )
        .await?;
        assert_eq!(json_body(response).await?, json!({ "health_score": 62 }));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_put_is_rejected() -> Result<()> {
        let server = server(30, None)?;

        let response = send(
            &server,
            json_request(Method::PUT, HEALTH_SCORE_PATH, &json!({ "health_score": "high" }))?,
        )
        .await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({ "error": "invalid score update" })
        );
        let current = send(&server, get_request(HEALTH_SCORE_PATH)?).await?;
        assert_eq!(json_body(current).await?, json!({ "health_score": 30 }));
        Ok(())
    }

    #[tokio::test]
    async fn assessments_adjust_the_score() -> Result<()> {
        let server = server(50, None)?;

        for (severity, expected) in [("normal", 65), ("serious", 50), ("mild", 45), ("sneezy", 45)]
        {
            let response = send(
                &server,
                json_request(Method::POST, ASSESSMENTS_PATH, &json!({ "severity": severity }))?,
            )
            .await?;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                json_body(response).await?,
                json!({ "health_score": expected })
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn assessment_history_keeps_the_latest_twenty() -> Result<()> {
        let server = server(50, None)?;
        for severity in std::iter::repeat_n("serious", 5).chain(std::iter::repeat_n("normal", 20)) {
            let response = send(
                &server,
                json_request(Method::POST, ASSESSMENTS_PATH, &json!({ "severity": severity }))?,
            )
            .await?;
            assert_eq!(response.status(), StatusCode::OK);
        }
        send(
            &server,
            json_request(Method::POST, ASSESSMENTS_PATH, &json!({ "severity": "sneezy" }))?,
        )
        .await?;

        let body = json_body(send(&server, get_request(ASSESSMENTS_PATH)?).await?).await?;
        let records = body["records"]
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("records missing"))?;
        assert_eq!(records.len(), 20);
        assert!(records.iter().all(|record| record["severity"] == "normal"));
        assert_eq!(records[19]["health_score"], 100);
        Ok(())
    }

    #[tokio::test]
    async fn quiz_requires_ten_numeric_answers() -> Result<()> {
        let server = server(30, None)?;

        let partial = json!({ "answers": [5, 5, 5, 5, 5, 5, 5, 5, 5] });
        let nine = send(&server, json_request(Method::POST, QUIZ_PATH, &partial)?).await?;
        assert_eq!(nine.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(nine).await?,
            json!({ "error": "Please answer all questions" })
        );

        let wordy = json!({ "answers": [5, 5, 5, "sometimes", 5, 5, 5, 5, 5, 5] });
        let response = send(&server, json_request(Method::POST, QUIZ_PATH, &wordy)?).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({ "error": "Invalid answer format" })
        );

        let current = send(&server, get_request(HEALTH_SCORE_PATH)?).await?;
        assert_eq!(json_body(current).await?, json!({ "health_score": 30 }));
        Ok(())
    }

    #[tokio::test]
    async fn quiz_total_becomes_the_score() -> Result<()> {
        let server = server(30, None)?;

        let answers = json!({ "answers": [10, 10, 10, 10, 10, 10, 10, "8.5", 4, 2] });
        let response = send(&server, json_request(Method::POST, QUIZ_PATH, &answers)?).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await?, json!({ "health_score": 84 }));

        let generous = json!({ "answers": [20, 20, 20, 20, 20, 20, 20, 20, 20, 20] });
        let response = send(&server, json_request(Method::POST, QUIZ_PATH, &generous)?).await?;
        assert_eq!(json_body(response).await?, json!({ "health_score": 100 }));

        let current = send(&server, get_request(HEALTH_SCORE_PATH)?).await?;
        assert_eq!(json_body(current).await?, json!({ "health_score": 100 }));
        Ok(())
    }

    #[tokio::test]
    async fn api_key_guards_score_routes() -> Result<()> {
        let server = server(40, Some("secret"))?;

        let denied = send(&server, get_request(HEALTH_SCORE_PATH)?).await?;
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(denied).await?,
            json!({ "error": "Not authenticated" })
        );

        let wrong = Request::builder()
            .uri(HEALTH_SCORE_PATH)
            .header(HEADER_API_KEY, "guess")
            .body(Body::empty())?;
        assert_eq!(send(&server, wrong).await?.status(), StatusCode::UNAUTHORIZED);

        let allowed = Request::builder()
            .uri(HEALTH_SCORE_PATH)
            .header(HEADER_API_KEY, "secret")
            .body(Body::empty())?;
        let response = send(&server, allowed).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await?, json!({ "health_score": 40 }));

        let health = send(&server, get_request("/health")?).await?;
        assert_eq!(health.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn health_reports_status_and_score() -> Result<()> {
        let server = server(88, None)?;

        let body = json_body(send(&server, get_request("/health")?).await?).await?;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["health_score"], 88);
        assert!(body["build"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn health_reports_the_last_served_gauge() -> Result<()> {
        let server = server(88, None)?;
        send(
            &server,
            json_request(Method::PUT, HEALTH_SCORE_PATH, &json!({ "health_score": 42 }))?,
        )
        .await?;

        let body = json_body(send(&server, get_request("/health")?).await?).await?;

        assert_eq!(body["health_score"], 42);
        assert_eq!(body["metrics"], json!({ "health_score": 42 }));
        Ok(())
    }

    #[tokio::test]
    async fn metrics_count_requests_and_assessments() -> Result<()> {
        let server = server(20, None)?;
        send(&server, get_request(HEALTH_SCORE_PATH)?).await?;
        send(
            &server,
            json_request(Method::POST, ASSESSMENTS_PATH, &json!({ "severity": "mild" }))?,
        )
        .await?;

        let response = send(&server, get_request("/metrics")?).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/plain; version=0.0.4")
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let text = String::from_utf8(bytes.to_vec())?;

        assert!(text.contains("route=\"/api/health-score\""));
        assert!(text.contains("assessments_total{severity=\"mild\"} 1"));
        assert!(text.contains("health_score 15"));
        Ok(())
    }
}
