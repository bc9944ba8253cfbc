//! Hub connection settings.
//!
//! Only the values the HTTP client needs: where the hub lives and how long
//! to wait for it. Both can be overridden from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Production hub backend
pub const DEFAULT_BASE_URL: &str = "https://payments.openbb.co";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the hub base URL
pub const BASE_URL_ENV: &str = "OPENBB_HUB_BACKEND";

/// Environment variable overriding the request timeout
pub const TIMEOUT_ENV: &str = "OPENBB_HUB_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HubConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults, with any environment overrides applied
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid hub timeout"),
            }
        }

        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join the base URL with a request path, tolerating a trailing slash
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
