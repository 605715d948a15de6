//! HTTP rendering of [`ScoreError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use psychoscore_core::ScoreError;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApiError(pub ScoreError);

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(ScoreError::validation(message))
    }
}

impl From<ScoreError> for ApiError {
    fn from(e: ScoreError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match &self.0 {
            ScoreError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone(), None)
            }
            ScoreError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            ScoreError::Upstream { provider, .. } => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                format!("{provider} request failed"),
                Some(self.0.to_string()),
            ),
            ScoreError::Timeout { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                "upstream_timeout",
                self.0.to_string(),
                None,
            ),
            ScoreError::Transport { provider, .. } => (
                StatusCode::BAD_GATEWAY,
                "upstream_unreachable",
                format!("{provider} is unreachable"),
                Some(self.0.to_string()),
            ),
            ScoreError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Failed to access local storage".to_string(),
                None,
            ),
            ScoreError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "config_error",
                msg.clone(),
                None,
            ),
            ScoreError::Other(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
                None,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = self.parts();
        if status.is_server_error() {
            error!(error = %self.0, error_code = code, "Request failed");
        } else {
            warn!(error = %self.0, error_code = code, "Request rejected");
        }
        let body = ErrorBody {
            error: message,
            detail,
            error_code: Some(code),
        };
        (status, Json(body)).into_response()
    }
}
