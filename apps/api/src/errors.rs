use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Platform posting failures are never represented here: they travel as
/// `PostResult` data so one board cannot fail a whole fan-out.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The generative service answered, but not with the expected JSON shape.
    #[error("Analysis parse error: {0}")]
    AnalysisParse(String),

    /// The generative service was unreachable, erroring or timed out. Callers may retry.
    #[error("Analysis service error: {0}")]
    AnalysisService(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(_) | LlmError::Shape(_) | LlmError::EmptyContent => {
                AppError::AnalysisParse(err.to_string())
            }
            LlmError::Http(_) | LlmError::Timeout | LlmError::Api { .. } => {
                AppError::AnalysisService(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::AnalysisParse(msg) => {
                tracing::error!("Analysis parse error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ANALYSIS_PARSE_ERROR",
                    "The AI analysis returned an unexpected result".to_string(),
                )
            }
            AppError::AnalysisService(msg) => {
                tracing::error!("Analysis service error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ANALYSIS_SERVICE_ERROR",
                    "The AI analysis service is unavailable, please retry".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
