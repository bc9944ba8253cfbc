//! Personal access token decoding.
//!
//! A PAT is a JWT issued by the hub. The client never verifies the
//! signature (the hub does that on `/sdk/login`); it only reads the payload
//! to reject tokens that are malformed or already expired.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::api::{HubError, Result};

/// Claims the hub puts in a personal access token payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub primary_usage: Option<String>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT without verifying it
    pub fn decode(token: &str) -> Result<Self> {
        let mut parts = token.trim().split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
            _ => return Err(invalid("expected three dot-separated segments")),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| invalid(&e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| invalid(&e.to_string()))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| exp < now).unwrap_or(false)
    }

    /// Fail if the token carries an `exp` claim in the past
    pub fn check_expiration(&self) -> Result<()> {
        if self.is_expired_at(Utc::now()) {
            return Err(HubError::Authentication(
                "Platform personal access token expired. Please generate a new one.".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> HubError {
    HubError::InvalidArgument(format!("Invalid personal access token: {}", reason))
}

/// Hub-issued sample token whose payload carries a full session
#[cfg(test)]
pub(crate) const SAMPLE_PAT: &str = concat!(
    "eyJ0eXAiOiJKV1QiLCJhbGciOiJFUzI1NiIsImtpZCI6ImRiMjEyZDdhZj",
    "c2MWI0ZTNlOGNjZGM3OWQ5Zjk4YWM5In0.eyJhY2Nlc3NfdG9rZW4iOiJ0",
    "b2tlbiIsInRva2VuX3R5cGUiOiJCZWFyZXIiLCJ1dWlkIjoidXVpZCIsInV",
    "zZXJuYW1lIjoidXNlcm5hbWUiLCJlbWFpbCI6ImVtYWlsIiwicHJpbWFyeV9",
    "1c2FnZSI6InByaW1hcnlfdXNhZ2UifQ.FAtE8-a1a-313Zoa6dREIxGZOHaW9",
    "-JLZnFzyJ6dlHBZnkjQT2tfaaefxnTdAlSmToQwxGykvuatmI7L0wztPQ"
);
