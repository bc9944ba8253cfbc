use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, HubError>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl HubError {
    /// Truncate a response body to avoid carrying excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build an authentication error from a rejected hub response.
    ///
    /// The hub reports failures as `{"detail": "..."}`; when that field is
    /// present it becomes the message, otherwise the (truncated) raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));

        let message = match detail {
            Some(detail) => detail,
            None if body.trim().is_empty() => format!("Status {}", status),
            None => format!("Status {}: {}", status, Self::truncate_body(body)),
        };
        HubError::Authentication(message)
    }

    pub fn not_connected() -> Self {
        HubError::Authentication("not connected to the hub".to_string())
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, HubError::Authentication(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, HubError::InvalidArgument(_))
    }
}
