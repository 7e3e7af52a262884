//! Session guard: every data fetch goes through here.
//!
//! A 401 means the session cookie is gone or expired; the guard navigates to
//! the login page and the caller renders nothing. Any other failure leaves the
//! current view untouched until the next scheduled fetch.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

use crate::client::{Backend, Endpoint, HttpReply};
use crate::errors::ClientError;
use crate::models::pagination::{DataEnvelope, ListQuery};

/// Capability to leave the current page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
}

/// Navigator that hands locations to the shell driving page lifecycles.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, location: &str) {
        if self.tx.send(location.to_string()).is_err() {
            tracing::debug!(location, "Navigation dropped, shell is gone");
        }
    }
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, location: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(location.to_string());
        }
    }
}

/// What the guard decided about one fetch.
#[derive(Debug)]
pub enum Verdict<T> {
    /// Successful fetch; hand the records to the renderer.
    Render(T),
    /// Session invalid; already redirected to login.
    Expired,
    /// Transient failure; leave the view as it is.
    Ignored(ClientError),
}

impl<T> Verdict<T> {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

#[derive(Clone)]
pub struct SessionGuard {
    navigator: Arc<dyn Navigator>,
    login_path: Arc<str>,
}

impl SessionGuard {
    pub fn new(navigator: Arc<dyn Navigator>, login_path: impl Into<Arc<str>>) -> Self {
        Self {
            navigator,
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Fetch one list endpoint and classify the outcome.
    pub async fn fetch_list<B, T>(
        &self,
        backend: &B,
        endpoint: Endpoint,
        query: &ListQuery,
    ) -> Verdict<Vec<T>>
    where
        B: Backend,
        T: DeserializeOwned,
    {
        let reply = backend.get(endpoint.path(), &query.pairs()).await;
        self.inspect(endpoint, reply)
    }

    /// Classify a completed (or failed) exchange.
    pub fn inspect<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        reply: Result<HttpReply, ClientError>,
    ) -> Verdict<Vec<T>> {
        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, endpoint = endpoint.path(), "Fetch failed");
                return Verdict::Ignored(e);
            }
        };

        if reply.is_success() {
            return match reply.json::<DataEnvelope<T>>() {
                Ok(envelope) => {
                    if let Some(meta) = &envelope.meta {
                        tracing::debug!(
                            endpoint = endpoint.path(),
                            total = meta.total,
                            page = meta.page,
                            "Fetched page"
                        );
                    }
                    Verdict::Render(envelope.into_records())
                }
                Err(e) => {
                    tracing::warn!(error = %e, endpoint = endpoint.path(), "Undecodable payload");
                    Verdict::Ignored(e)
                }
            };
        }

        match ClientError::from_status(reply.status) {
            ClientError::Unauthorized => {
                tracing::info!(
                    endpoint = endpoint.path(),
                    redirect = %self.login_path,
                    "Session expired"
                );
                self.navigator.navigate(&self.login_path);
                Verdict::Expired
            }
            other => {
                tracing::debug!(error = %other, endpoint = endpoint.path(), "Ignoring failed fetch");
                Verdict::Ignored(other)
            }
        }
    }
}
