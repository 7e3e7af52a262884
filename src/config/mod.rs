use std::env;
use std::time::Duration;

/// Console configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub page_size: u32,
    pub login_path: String,
    pub dashboard_path: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            poll_interval_secs: 5,
            request_timeout_secs: 10,
            page_size: 20,
            login_path: "/login.html".to_string(),
            dashboard_path: "/index.html".to_string(),
            email: None,
            password: None,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("GUARD_API_URL").unwrap_or(defaults.api_url),
            poll_interval_secs: env::var("GUARD_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(defaults.poll_interval_secs),
            request_timeout_secs: env::var("GUARD_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(defaults.request_timeout_secs),
            page_size: env::var("GUARD_PAGE_SIZE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(defaults.page_size),
            login_path: env::var("GUARD_LOGIN_PATH").unwrap_or(defaults.login_path),
            dashboard_path: env::var("GUARD_DASHBOARD_PATH").unwrap_or(defaults.dashboard_path),
            email: env::var("GUARD_EMAIL").ok(),
            password: env::var("GUARD_PASSWORD").ok(),
        }
    }

    /// Interval between detection feed polls. Never zero.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
