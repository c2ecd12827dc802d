//! Unified error handling for calls against the CookSetu backend.
//!
//! Every remote operation reports failure through [`ApiError`]. Non-2xx
//! responses carry the server's own `message` when the body has one, and a
//! per-operation fallback otherwise.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// A 2xx response whose body did not match the expected shape
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// Client-side check failed; nothing was sent
    #[error("{0}")]
    Validation(String),

    #[error("Not authenticated. Log in first.")]
    Unauthenticated,

    /// The session is valid but its role may not use this view
    #[error("{0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status for `Status` errors
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Build a `Status` error from a failed response body.
    pub fn from_response_body(status: StatusCode, body: &str, fallback: &str) -> Self {
        Self::Status {
            status,
            message: extract_message(body).unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Error body shapes the backend is known to send
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Message { message: String },
    Nested { error: NestedError },
    Plain { error: String },
}

#[derive(Debug, Deserialize)]
struct NestedError {
    message: String,
}

/// Pull a human-readable message out of an error response body
pub fn extract_message(body: &str) -> Option<String> {
    let message = match serde_json::from_str::<ErrorBody>(body).ok()? {
        ErrorBody::Message { message } => message,
        ErrorBody::Nested { error } => error.message,
        ErrorBody::Plain { error } => error,
    };
    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
