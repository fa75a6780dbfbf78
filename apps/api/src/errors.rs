use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The completion API answered with a non-success status. The body is relayed as-is.
    #[error("Upstream error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, message } => AppError::Upstream {
                status,
                body: message,
            },
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upstream { status, body } => {
                tracing::error!("Completion API returned {status}: {body}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    body.clone(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("too short".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_becomes_upstream_with_raw_body() {
        let err: AppError = LlmError::Api {
            status: 402,
            message: "Insufficient Balance".to_string(),
        }
        .into();
        match &err {
            AppError::Upstream { status, body } => {
                assert_eq!(*status, 402);
                assert_eq!(body, "Insufficient Balance");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_error_is_generic_llm_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AppError = LlmError::Parse(parse_err).into();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
