// Error handling framework

use serde::Serialize;
use thiserror::Error;

/// Errors raised while talking to the workforce API
#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API rejected the request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Failed to decode API response: {0}")]
    InvalidBody(String),
}

impl ApiClientError {
    /// True for the 404 family, which the selection screen turns into a
    /// "not found" notification instead of a generic error toast
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiClientError::Rejected { status: 404, .. })
    }

    /// The message surfaced to the user. For rejections this is the API's
    /// `detail` field verbatim; other variants fall back to their display.
    pub fn detail(&self) -> String {
        match self {
            ApiClientError::Rejected { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// A field-level validation failure, rendered inline next to its form field
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
