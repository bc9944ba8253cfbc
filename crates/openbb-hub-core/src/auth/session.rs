use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::api::{HubError, Result};

/// Placeholder shown wherever a secret would otherwise be rendered
pub const REDACTED: &str = "**********";

/// Login payload returned by `/login` and `/sdk/login`.
#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    primary_usage: Option<String>,
}

/// Authenticated hub context. Immutable once created.
#[derive(Debug)]
pub struct Session {
    access_token: SecretString,
    token_type: String,
    user_uuid: String,
    email: String,
    username: String,
    primary_usage: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(access_token: SecretString, token_type: impl Into<String>) -> Self {
        Self {
            access_token,
            token_type: token_type.into(),
            user_uuid: String::new(),
            email: String::new(),
            username: String::new(),
            primary_usage: String::new(),
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    pub(crate) fn from_login(response: LoginResponse) -> Result<Self> {
        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HubError::InvalidResponse("login response has no access_token".into()))?;
        let token_type = response
            .token_type
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HubError::InvalidResponse("login response has no token_type".into()))?;

        Ok(Self {
            access_token: SecretString::from(access_token),
            token_type,
            user_uuid: response.uuid.unwrap_or_default(),
            email: response.email.unwrap_or_default(),
            username: response.username.unwrap_or_default(),
            primary_usage: response.primary_usage.unwrap_or_default(),
            created_at: Utc::now(),
            expires_at: None,
        })
    }

    pub(crate) fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn user_uuid(&self) -> &str {
        &self.user_uuid
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn primary_usage(&self) -> &str {
        &self.primary_usage
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| Utc::now() > exp).unwrap_or(false)
    }

    /// Value for the `Authorization` header: `<token_type> <access_token>`
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token.expose_secret())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session(username={}, email={}, token_type={}, access_token={})",
            self.username, self.email, self.token_type, REDACTED
        )
    }
}
