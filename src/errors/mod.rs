//! Unified client error taxonomy.

use reqwest::StatusCode;
use serde::Deserialize;

/// Message body returned by the auth endpoints on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiMessage {
    /// Decode a `{ message }` body, tolerating empty or non-JSON payloads.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Client error type covering every way a backend exchange can fail.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status}")]
    Server { status: StatusCode },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Check if this error means the session is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this error never reached the server or came back unreadable.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_))
    }

    /// Map a non-success status into the taxonomy.
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized
        } else {
            Self::Server { status }
        }
    }
}
