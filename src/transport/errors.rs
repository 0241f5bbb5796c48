use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by the transport and the resource clients.
///
/// Authorization failures are plain [`ApiError::Http`] values with a 401/403
/// status; nothing at this layer treats them differently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("http {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Http {
        status: u16,
        message: Option<String>,
    },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid request parameters: {0}")]
    InvalidParams(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Builds an HTTP error from a status code and the raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(server_message);
        ApiError::Http { status, message }
    }

    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// One-line text for a notification: the server message when present,
    /// `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Extracts `message` (or `error`) from a JSON error body.
fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
