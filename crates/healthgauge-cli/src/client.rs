//! Shared client utilities, error types, and the HTTP score source.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use healthgauge_core::api::{HEADER_API_KEY, HEADER_REQUEST_ID};
use healthgauge_core::{FetchError, HEALTH_SCORE_PATH, ScoreSource};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;

use crate::cli::Cli;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// HTTP client configured from CLI flags.
pub(crate) fn build_client(cli: &Cli, trace_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id)
        .map_err(|_| CliError::failure(anyhow!("trace identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) api_key: Option<String>,
}

impl AppContext {
    /// Resolve a route against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> CliResult<Url> {
        route_url(&self.base_url, path).map_err(|err| CliError::failure(anyhow!(err)))
    }

    /// Attach the API key header when one was supplied.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(HEADER_API_KEY, key),
            None => request,
        }
    }
}

/// Score source issuing `GET /api/health-score` through reqwest.
pub(crate) struct ReqwestScoreSource {
    ctx: AppContext,
}

impl ReqwestScoreSource {
    pub(crate) const fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait(?Send)]
impl ScoreSource for ReqwestScoreSource {
    async fn fetch_score_body(&self) -> Result<Value, FetchError> {
        let url = route_url(&self.ctx.base_url, HEALTH_SCORE_PATH).map_err(FetchError::transport)?;
        let response = self
            .ctx
            .authorize(self.ctx.client.get(url))
            .send()
            .await
            .map_err(FetchError::transport)?;
        tracing::debug!(status = %response.status(), "health score response received");
        let bytes = response.bytes().await.map_err(FetchError::transport)?;
        serde_json::from_slice(&bytes).map_err(FetchError::decode)
    }
}

/// Append a route to the base URL, keeping any path prefix the base carries.
pub(crate) fn route_url(base: &Url, path: &str) -> Result<Url, String> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|err| format!("cannot resolve '{path}': {err}"))
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Parse the API key provided to the CLI.
pub(crate) fn parse_api_key(input: Option<String>) -> CliResult<Option<String>> {
    let Some(raw) = input else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation("API key cannot be an empty string"));
    }
    Ok(Some(trimmed.to_string()))
}

/// Classify an unsuccessful HTTP response into a CLI error.
pub(crate) async fn classify_problem(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();
    let message = serde_json::from_slice::<Value>(&bytes)
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string));

    match (status, message) {
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, Some(message)) => {
            CliError::validation(message)
        }
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, None) => {
            CliError::validation(format!("request rejected (status {status})"))
        }
        (_, Some(message)) => CliError::failure(anyhow!("{message} (status {status})")),
        (_, None) if !body_text.is_empty() => {
            CliError::failure(anyhow!("{body_text} (status {status})"))
        }
        (_, None) => CliError::failure(anyhow!("request failed with status {status}")),
    }
}
