//! # Design
//!
//! - Keep error messages constant while carrying the failure detail as a field.
//! - Every variant collapses into the same reported outcome; the split only feeds logs.

use thiserror::Error;

/// Failures while obtaining the score body.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (network, CORS, timeout).
    #[error("health score request failed")]
    Transport {
        /// Transport-level error text.
        detail: String,
    },
    /// The response body was not valid JSON.
    #[error("health score response was not valid json")]
    Decode {
        /// Parser error text.
        detail: String,
    },
    /// The body parsed as JSON `null`, which has no fields to read.
    #[error("health score response was null")]
    NullBody,
}

impl FetchError {
    /// Build a transport failure from any displayable error.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            detail: err.to_string(),
        }
    }

    /// Build a decode failure from any displayable error.
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode {
            detail: err.to_string(),
        }
    }

    /// Underlying detail recorded alongside the constant message.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Transport { detail } | Self::Decode { detail } => detail,
            Self::NullBody => "null",
        }
    }
}
