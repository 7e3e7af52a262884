//! Backend access: the `Backend` seam and its reqwest implementation.

pub mod http;
#[cfg(test)]
pub mod scripted;

use std::future::Future;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::errors::ClientError;

pub use http::HttpBackend;

/// Data endpoints polled by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Detections,
    Agents,
    Alerts,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Detections => "/v1/detections",
            Self::Agents => "/v1/agents",
            Self::Alerts => "/v1/alerts",
        }
    }
}

pub const LOGIN_PATH: &str = "/auth/login";
pub const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";

/// Raw response as seen by the session guard: status plus undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Transport used by views and forms.
///
/// Only transport failures are errors here; every HTTP status, 401 included,
/// comes back as an `HttpReply` so the caller decides what it means.
pub trait Backend: Send + Sync + 'static {
    fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> impl Future<Output = Result<HttpReply, ClientError>> + Send;

    fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<HttpReply, ClientError>> + Send;
}
