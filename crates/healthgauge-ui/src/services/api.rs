//! Score source over `fetch`.

use async_trait::async_trait;
use gloo_net::http::Request;
use healthgauge_core::{FetchError, ScoreSource};
use serde_json::Value;
use web_sys::Document;

use crate::config::{API_BASE_META, resolve_base_url, score_url};

/// Fetches the score from the configured origin.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Client rooted at `base_url`; empty means same-origin.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Client rooted at the page's `healthgauge-api-base` meta tag, if any.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let content = document
            .query_selector(&format!("meta[name=\"{API_BASE_META}\"]"))
            .ok()
            .flatten()
            .and_then(|meta| meta.get_attribute("content"));
        Self::new(resolve_base_url(content.as_deref()))
    }
}

#[async_trait(?Send)]
impl ScoreSource for ApiClient {
    async fn fetch_score_body(&self) -> Result<Value, FetchError> {
        let response = Request::get(&score_url(&self.base_url))
            .send()
            .await
            .map_err(FetchError::transport)?;
        response.json::<Value>().await.map_err(FetchError::decode)
    }
}
