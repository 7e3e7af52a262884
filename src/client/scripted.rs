//! In-memory backend for unit tests: canned replies per path, call log.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::StatusCode;

use super::{Backend, HttpReply};
use crate::errors::ClientError;

#[derive(Debug, Clone)]
pub enum Scripted {
    Reply {
        status: StatusCode,
        body: String,
        delay: Duration,
    },
    /// Never resolves, like a request stuck on the network.
    Hang,
}

impl Scripted {
    pub fn ok(body: serde_json::Value) -> Self {
        Self::status(StatusCode::OK, body)
    }

    pub fn status(status: StatusCode, body: serde_json::Value) -> Self {
        Self::Reply {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self::Reply {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(self, by: Duration) -> Self {
        match self {
            Self::Reply { status, body, .. } => Self::Reply {
                status,
                body,
                delay: by,
            },
            Self::Hang => Self::Hang,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

#[derive(Default)]
struct Script {
    queued: HashMap<String, VecDeque<Scripted>>,
    fallback: HashMap<String, Scripted>,
    calls: Vec<Call>,
}

/// Replies come from the per-path queue first, then the path's fallback,
/// then a bare 404.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always(self, path: &str, reply: Scripted) -> Self {
        self.script
            .lock()
            .unwrap()
            .fallback
            .insert(path.to_string(), reply);
        self
    }

    pub fn then(self, path: &str, reply: Scripted) -> Self {
        self.script
            .lock()
            .unwrap()
            .queued
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.script
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.path == path)
            .count()
    }

    fn next(&self, call: Call) -> Scripted {
        let mut script = self.script.lock().unwrap();
        let path = call.path.clone();
        script.calls.push(call);
        if let Some(reply) = script.queued.get_mut(&path).and_then(VecDeque::pop_front) {
            return reply;
        }
        script
            .fallback
            .get(&path)
            .cloned()
            .unwrap_or_else(|| Scripted::raw(StatusCode::NOT_FOUND, ""))
    }

    async fn play(reply: Scripted) -> Result<HttpReply, ClientError> {
        match reply {
            Scripted::Reply {
                status,
                body,
                delay,
            } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpReply::new(status, body))
            }
            Scripted::Hang => std::future::pending().await,
        }
    }
}

impl Backend for ScriptedBackend {
    async fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<HttpReply, ClientError> {
        let reply = self.next(Call {
            method: "GET",
            path: path.to_string(),
            query: query.to_vec(),
            body: None,
        });
        Self::play(reply).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpReply, ClientError> {
        let reply = self.next(Call {
            method: "POST",
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body.clone()),
        });
        Self::play(reply).await
    }
}
