//! Transport seam between the session bridge and the network.
//!
//! The bridge never talks to reqwest directly. It builds a `HubRequest`
//! and hands it to whatever `HubTransport` it was constructed with, which
//! makes every hub call testable with an in-memory transport.

use std::fmt;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{HubError, Result};

/// A single call to the hub.
#[derive(Clone)]
pub struct HubRequest {
    /// Short name of the operation, used for logging ("login", "logout", ...)
    pub label: &'static str,
    pub method: Method,
    /// Path relative to the hub base URL, starting with `/`
    pub path: String,
    /// Full `Authorization` header value, if the call is authenticated
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl HubRequest {
    pub fn new(label: &'static str, method: Method, path: impl Into<String>) -> Self {
        Self {
            label,
            method,
            path: path.into(),
            authorization: None,
            body: None,
        }
    }

    pub fn get(label: &'static str, path: impl Into<String>) -> Self {
        Self::new(label, Method::GET, path)
    }

    pub fn post(label: &'static str, path: impl Into<String>) -> Self {
        Self::new(label, Method::POST, path)
    }

    pub fn put(label: &'static str, path: impl Into<String>) -> Self {
        Self::new(label, Method::PUT, path)
    }

    pub fn authorization(mut self, value: String) -> Self {
        self.authorization = Some(value);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl fmt::Debug for HubRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header and body may carry the token, a password or provider keys
        f.debug_struct("HubRequest")
            .field("label", &self.label)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("authorization", &self.authorization.as_ref().map(|_| crate::auth::REDACTED))
            .field("body", &self.body.as_ref().map(|_| crate::auth::REDACTED))
            .finish()
    }
}

/// Status and raw body of a hub response.
#[derive(Clone)]
pub struct HubResponse {
    pub status: u16,
    pub body: String,
}

impl fmt::Debug for HubResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubResponse")
            .field("status", &self.status)
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl HubResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The hub signals success with exactly 200
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| HubError::InvalidResponse(format!("{} (status {})", e, self.status)))
    }

    /// Turn a non-200 response into an authentication error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(HubError::from_status(self.status, &self.body))
        }
    }
}

/// Anything that can perform a labeled request against the hub.
#[async_trait]
pub trait HubTransport: Send + Sync {
    async fn send(&self, request: HubRequest) -> Result<HubResponse>;
}
