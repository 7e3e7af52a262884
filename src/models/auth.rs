//! Request and response DTOs for the login and password-reset forms.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /auth/login`. Validated with the same rules the backend applies.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// First failing rule, checked in form field order.
    pub fn first_violation(&self) -> Option<String> {
        let errors = self.validate().err()?;
        let fields = errors.field_errors();
        ["email", "password"].iter().find_map(|field| {
            fields.get(*field).and_then(|errs| {
                errs.first().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {field}"))
                })
            })
        })
    }
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Authenticated user echoed back by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub org_id: String,
    pub role: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
}
