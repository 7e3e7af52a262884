//! Page lifecycle driver.
//!
//! The shell plays the part of the browsing context: it loads the current
//! location, forwards renders to a [`Screen`], and on navigation tears the
//! page down (dropping its view handle) before loading the next one.

use std::future::Future;

use tokio::sync::mpsc;

use super::{PageChrome, PageKind, Router};
use crate::client::Backend;
use crate::models::auth::LoginForm;
use crate::render::Node;
use crate::services::auth::{AuthForms, FormOutcome, MessageArea};

/// Where rendered output goes.
pub trait Screen: Send {
    fn show(&mut self, page: PageKind, content: &[Node]);

    fn message(&mut self, area: &MessageArea);
}

/// Why the shell stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellExit {
    Shutdown,
    /// Reached a page with nothing to run.
    Unroutable(String),
    /// Landed on the login page without credentials to submit.
    LoginRequired,
    /// Credentials were submitted and refused.
    LoginRejected(String),
    /// Too many navigations; likely a redirect loop.
    NavigationLimit,
}

pub struct Shell<B> {
    router: Router<B>,
    forms: AuthForms<B>,
    navigations: mpsc::UnboundedReceiver<String>,
    login_path: String,
    credentials: Option<LoginForm>,
    max_navigations: usize,
}

impl<B: Backend> Shell<B> {
    pub fn new(
        router: Router<B>,
        forms: AuthForms<B>,
        navigations: mpsc::UnboundedReceiver<String>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            router,
            forms,
            navigations,
            login_path: login_path.into(),
            credentials: None,
            max_navigations: 16,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<LoginForm>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_max_navigations(mut self, max: usize) -> Self {
        self.max_navigations = max;
        self
    }

    /// Drop navigations queued by a page that is already gone.
    fn discard_stale_navigations(&mut self) {
        let mut stale = 0usize;
        while self.navigations.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            tracing::debug!(stale, "Discarded stale navigations");
        }
    }

    fn is_login_page(&self, location: &str) -> bool {
        location
            .split(['?', '#'])
            .next()
            .is_some_and(|path| path.ends_with(self.login_path.as_str()))
    }

    /// Run from `start` until shutdown or a page with nothing left to do.
    pub async fn run<S, F>(mut self, start: &str, screen: &mut S, shutdown: F) -> ShellExit
    where
        S: Screen,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut location = start.to_string();

        for _ in 0..=self.max_navigations {
            let next = if self.is_login_page(&location) {
                let Some(credentials) = self.credentials.clone() else {
                    tracing::warn!(location = %location, "Login required, no credentials configured");
                    return ShellExit::LoginRequired;
                };
                self.discard_stale_navigations();
                if self.forms.submit_login(&credentials).await == FormOutcome::Stayed {
                    screen.message(self.forms.message());
                    return ShellExit::LoginRejected(self.forms.message().text.clone());
                }
                None
            } else {
                let page = self.router.load(&location, PageChrome::standard());
                let Some((controller, handle)) = page.view else {
                    return ShellExit::Unroutable(location);
                };

                let mut content = controller.container().subscribe();
                let next = loop {
                    tokio::select! {
                        changed = content.changed() => {
                            if changed.is_err() {
                                break None;
                            }
                            let nodes = content.borrow_and_update().clone();
                            screen.show(page.kind, &nodes);
                        }
                        next = self.navigations.recv() => match next {
                            Some(next) => break Some(next),
                            None => return ShellExit::Shutdown,
                        },
                        _ = &mut shutdown => return ShellExit::Shutdown,
                    }
                };
                drop(handle);
                self.discard_stale_navigations();
                tracing::debug!(location = %location, "Page torn down");
                next
            };

            location = match next {
                Some(next) => next,
                None => tokio::select! {
                    next = self.navigations.recv() => match next {
                        Some(next) => next,
                        None => return ShellExit::Shutdown,
                    },
                    _ = &mut shutdown => return ShellExit::Shutdown,
                },
            };
        }

        ShellExit::NavigationLimit
    }
}
