//! Page view controllers and the pieces they share.
//!
//! Each controller owns exactly one [`Container`]. Activation spawns the
//! controller's fetch/render work and returns a [`ViewHandle`]; dropping the
//! handle is the page teardown.

pub mod agents;
pub mod alerts;
pub mod detections;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::{Backend, Endpoint};
use crate::models::pagination::ListQuery;
use crate::render::{LocalClock, Node};
use crate::router::PageKind;
use crate::services::session::{SessionGuard, Verdict};

pub use agents::AgentsTable;
pub use alerts::AlertsList;
pub use detections::DetectionsFeed;

/// Lifecycle of a view's fetch/render cycle.
///
/// `Failed` is the idle state after a swallowed failure; the next fetch leaves it.
/// `Unauthorized` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Fetching,
    Rendered,
    Unauthorized,
    Failed,
}

/// Shared writer for a view's state.
#[derive(Clone)]
pub(crate) struct StatusCell {
    tx: Arc<watch::Sender<ViewState>>,
}

impl StatusCell {
    pub(crate) fn new() -> (Self, watch::Receiver<ViewState>) {
        let (tx, rx) = watch::channel(ViewState::Idle);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub(crate) fn is_expired(&self) -> bool {
        *self.tx.borrow() == ViewState::Unauthorized
    }

    pub(crate) fn set(&self, next: ViewState) {
        self.tx.send_if_modified(|current| {
            if *current == ViewState::Unauthorized || *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

/// Content slot a single view renders into.
///
/// Every render replaces the whole content; observers always see the latest
/// snapshot.
#[derive(Clone)]
pub struct Container {
    selector: &'static str,
    slot: Arc<watch::Sender<Vec<Node>>>,
}

impl Container {
    pub fn new(selector: &'static str) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            selector,
            slot: Arc::new(tx),
        }
    }

    pub fn selector(&self) -> &'static str {
        self.selector
    }

    pub fn replace(&self, nodes: Vec<Node>) {
        self.slot.send_replace(nodes);
    }

    pub fn snapshot(&self) -> Vec<Node> {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Node>> {
        self.slot.subscribe()
    }
}

/// Owned handle to an activated view.
///
/// Cancelling or dropping it stops the view's timer and abandons any
/// in-flight fetch.
pub struct ViewHandle {
    task: JoinHandle<()>,
    state: watch::Receiver<ViewState>,
    joined: bool,
}

impl ViewHandle {
    pub(crate) fn new(task: JoinHandle<()>, state: watch::Receiver<ViewState>) -> Self {
        Self {
            task,
            state,
            joined: false,
        }
    }

    pub fn state(&self) -> ViewState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the view's work to end and return its final state.
    ///
    /// Single-shot views end after one fetch; the detections feed only ends
    /// on session expiry or cancellation.
    pub async fn settled(&mut self) -> ViewState {
        if !self.joined {
            let _ = (&mut self.task).await;
            self.joined = true;
        }
        self.state()
    }
}

impl Drop for ViewHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Polymorphic page controller with a uniform activation capability.
pub trait ViewController: Send + Sync {
    fn kind(&self) -> PageKind;

    fn container(&self) -> &Container;

    fn activate(self: Arc<Self>) -> ViewHandle;
}

/// Everything a view needs to fetch and render.
pub struct ViewContext<B> {
    pub backend: Arc<B>,
    pub guard: SessionGuard,
    pub clock: LocalClock,
    pub query: ListQuery,
}

impl<B> Clone for ViewContext<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            guard: self.guard.clone(),
            clock: self.clock,
            query: self.query,
        }
    }
}

impl<B: Backend> ViewContext<B> {
    /// One fetch-then-render cycle through the session guard.
    pub(crate) async fn refresh<T, F>(
        &self,
        endpoint: Endpoint,
        container: &Container,
        status: &StatusCell,
        render: F,
    ) -> ViewState
    where
        T: DeserializeOwned + Send,
        F: Fn(&[T], &LocalClock) -> Vec<Node> + Send,
    {
        status.set(ViewState::Fetching);
        let outcome = match self
            .guard
            .fetch_list::<B, T>(&self.backend, endpoint, &self.query)
            .await
        {
            // An overlapping fetch may already have redirected to login.
            Verdict::Render(_) if status.is_expired() => {
                tracing::debug!(
                    container = container.selector(),
                    "Discarding render after session expiry"
                );
                ViewState::Unauthorized
            }
            Verdict::Render(records) => {
                container.replace(render(&records, &self.clock));
                tracing::debug!(
                    container = container.selector(),
                    count = records.len(),
                    "Rendered"
                );
                ViewState::Rendered
            }
            Verdict::Expired => ViewState::Unauthorized,
            Verdict::Ignored(_) => ViewState::Failed,
        };
        status.set(outcome);
        outcome
    }
}
