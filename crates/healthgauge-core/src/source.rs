//! Score source seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

/// Something that can fetch the health score body.
///
/// Futures are not required to be `Send` so browser fetch futures fit.
#[async_trait(?Send)]
pub trait ScoreSource {
    /// Issue one request and return the parsed JSON body.
    ///
    /// HTTP status is not inspected; any body that parses is returned.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when no response arrives and
    /// [`FetchError::Decode`] when the body is not JSON.
    async fn fetch_score_body(&self) -> Result<Value, FetchError>;
}
