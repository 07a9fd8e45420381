pub mod foremen;
pub mod health;
pub mod pages;
pub mod shared_utils;
pub mod tasks;
pub mod technicians;

// Common response types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::errors::ApiClientError;
use serde::Serialize;

/// Standard error response for failures that are not handled inline as
/// form errors or toasts
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub trace_id: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_timeout" => StatusCode::GATEWAY_TIMEOUT,
            "upstream_rejected" | "upstream_unreachable" | "upstream_invalid" => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<ApiClientError> for ErrorResponse {
    fn from(e: ApiClientError) -> Self {
        let code = match &e {
            ApiClientError::Rejected { status: 404, .. } => "not_found",
            ApiClientError::Rejected { .. } => "upstream_rejected",
            ApiClientError::Timeout(_) => "upstream_timeout",
            ApiClientError::RequestFailed(_) => "upstream_unreachable",
            ApiClientError::InvalidBody(_) => "upstream_invalid",
        };
        Self::new(code, e.detail())
    }
}
