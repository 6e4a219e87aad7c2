//! Conversion of non-2xx API responses into [`OpsError`].

use std::fmt;

use reqwest::StatusCode;

use crate::error::OpsError;

/// Longest response body kept in an error message
const MAX_BODY_CHARS: usize = 200;

/// A non-2xx response from the operations API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Build from a failed response, reading its body for context.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::new(status, summarize_body(status, &body))
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ApiError> for OpsError {
    fn from(error: ApiError) -> Self {
        if error.is_unauthorized() {
            return OpsError::Unauthorized(error.message);
        }
        OpsError::Rejected {
            status: error.status.as_u16(),
            message: error.message,
        }
    }
}

/// Prefer a JSON `message`/`error` field, then the raw body, then the reason
/// phrase.
fn summarize_body(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return status.canonical_reason().unwrap_or("Unknown").to_string();
    }
    body.chars().take(MAX_BODY_CHARS).collect()
}
