pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod router;
pub mod services;
pub mod views;

use std::sync::Arc;

use tokio::sync::mpsc;

use client::Backend;
use config::ConsoleConfig;
use models::auth::LoginForm;
use models::pagination::ListQuery;
use render::LocalClock;
use router::shell::Shell;
use router::Router;
use services::auth::AuthForms;
use services::session::{ChannelNavigator, Navigator, SessionGuard};
use views::ViewContext;

/// Wiring shared by every page of one console session.
pub struct Console<B> {
    pub config: ConsoleConfig,
    pub backend: Arc<B>,
    pub navigator: Arc<dyn Navigator>,
    navigations: mpsc::UnboundedReceiver<String>,
}

impl<B: Backend> Console<B> {
    pub fn new(config: ConsoleConfig, backend: B) -> Self {
        let (navigator, navigations) = ChannelNavigator::new();
        Self {
            config,
            backend: Arc::new(backend),
            navigator: Arc::new(navigator),
            navigations,
        }
    }

    pub fn view_context(&self, clock: LocalClock) -> ViewContext<B> {
        ViewContext {
            backend: Arc::clone(&self.backend),
            guard: SessionGuard::new(Arc::clone(&self.navigator), self.config.login_path.as_str()),
            clock,
            query: ListQuery::with_page_size(self.config.page_size),
        }
    }

    pub fn router(&self, clock: LocalClock) -> Router<B> {
        Router::new(self.view_context(clock), self.config.poll_interval())
    }

    pub fn auth_forms(&self) -> AuthForms<B> {
        AuthForms::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.navigator),
            self.config.dashboard_path.as_str(),
        )
    }

    /// Credentials from configuration, if both halves are set.
    pub fn credentials(&self) -> Option<LoginForm> {
        match (&self.config.email, &self.config.password) {
            (Some(email), Some(password)) => Some(LoginForm::new(email.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Consume the wiring into a shell that follows navigations.
    pub fn into_shell(self, clock: LocalClock) -> Shell<B> {
        let router = self.router(clock);
        let forms = self.auth_forms();
        let credentials = self.credentials();
        Shell::new(router, forms, self.navigations, self.config.login_path)
            .with_credentials(credentials)
    }
}
