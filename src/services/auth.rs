//! Authentication forms: login and password reset, with an inline message area.

use std::sync::Arc;

use serde::Serialize;

use crate::client::{Backend, FORGOT_PASSWORD_PATH, LOGIN_PATH};
use crate::errors::{ApiMessage, ClientError};
use crate::models::auth::{ForgotPasswordForm, LoginForm, LoginResponse};
use crate::render::{Element, Node};
use crate::services::session::Navigator;

const LOGIN_FAILED: &str = "Login failed";
const LOGIN_UNREACHABLE: &str = "An error occurred during login. Please try again.";
const RESET_SENT: &str =
    "If an account with that email exists, a password reset link has been sent.";
const RESET_UNREACHABLE: &str = "An error occurred. Please try again.";
const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Inline feedback area under the auth forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageArea {
    pub text: String,
    pub kind: MessageKind,
    pub visible: bool,
}

impl Default for MessageArea {
    fn default() -> Self {
        Self {
            text: String::new(),
            kind: MessageKind::Success,
            visible: false,
        }
    }
}

impl MessageArea {
    pub fn display(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.text = text.into();
        self.kind = kind;
        self.visible = true;
    }

    pub fn is_error(&self) -> bool {
        self.visible && self.kind == MessageKind::Error
    }

    pub fn render(&self) -> Node {
        Element::new("div")
            .class("form-message")
            .class(self.kind.as_str())
            .text(self.text.as_str())
            .into()
    }
}

/// Result of submitting a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// The page navigated away.
    Redirected(String),
    /// The page stayed; the message area holds the feedback.
    Stayed,
}

/// Login and forgot-password forms bound to one message area.
pub struct AuthForms<B> {
    backend: Arc<B>,
    navigator: Arc<dyn Navigator>,
    dashboard_path: String,
    message: MessageArea,
}

impl<B: Backend> AuthForms<B> {
    pub fn new(
        backend: Arc<B>,
        navigator: Arc<dyn Navigator>,
        dashboard_path: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            navigator,
            dashboard_path: dashboard_path.into(),
            message: MessageArea::default(),
        }
    }

    pub fn message(&self) -> &MessageArea {
        &self.message
    }

    /// Submit the login form. Success navigates to the dashboard; anything
    /// else is shown in the message area.
    pub async fn submit_login(&mut self, form: &LoginForm) -> FormOutcome {
        self.message.display("", MessageKind::Success);

        if let Some(violation) = form.first_violation() {
            tracing::warn!(reason = %violation, "Login form rejected before submit");
            self.message.display(violation, MessageKind::Error);
            return FormOutcome::Stayed;
        }

        match self.post(LOGIN_PATH, form).await {
            Ok(reply) if reply.is_success() => match reply.json::<LoginResponse>() {
                Ok(LoginResponse { success: true, user, .. }) => {
                    tracing::info!(
                        user = user.as_ref().map(|u| u.email.as_str()).unwrap_or_default(),
                        "Login succeeded"
                    );
                    self.navigator.navigate(&self.dashboard_path);
                    FormOutcome::Redirected(self.dashboard_path.clone())
                }
                Ok(LoginResponse { message, .. }) => {
                    self.message.display(
                        message.unwrap_or_else(|| LOGIN_FAILED.to_string()),
                        MessageKind::Error,
                    );
                    FormOutcome::Stayed
                }
                Err(e) => {
                    tracing::error!(error = %e, "Error during login");
                    self.message.display(LOGIN_UNREACHABLE, MessageKind::Error);
                    FormOutcome::Stayed
                }
            },
            Ok(reply) => {
                tracing::debug!(status = %reply.status, "Login rejected");
                let text = ApiMessage::from_body(&reply.body)
                    .message
                    .unwrap_or_else(|| LOGIN_FAILED.to_string());
                self.message.display(text, MessageKind::Error);
                FormOutcome::Stayed
            }
            Err(e) => {
                tracing::error!(error = %e, "Error during login");
                self.message.display(LOGIN_UNREACHABLE, MessageKind::Error);
                FormOutcome::Stayed
            }
        }
    }

    /// Submit the forgot-password form. Never navigates.
    pub async fn submit_forgot_password(&mut self, email: &str) -> FormOutcome {
        self.message.display("", MessageKind::Success);

        let form = ForgotPasswordForm {
            email: email.to_string(),
        };

        match self.post(FORGOT_PASSWORD_PATH, &form).await {
            Ok(reply) if reply.is_success() => {
                self.message.display(RESET_SENT, MessageKind::Success);
            }
            Ok(reply) => {
                let reason = ApiMessage::from_body(&reply.body)
                    .message
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                self.message
                    .display(format!("Password reset failed: {reason}"), MessageKind::Error);
            }
            Err(e) => {
                tracing::error!(error = %e, "Error during forgot password");
                self.message.display(RESET_UNREACHABLE, MessageKind::Error);
            }
        }
        FormOutcome::Stayed
    }

    async fn post<T: Serialize>(
        &self,
        path: &str,
        form: &T,
    ) -> Result<crate::client::HttpReply, ClientError> {
        let body = serde_json::to_value(form)?;
        self.backend.post_json(path, &body).await
    }
}
