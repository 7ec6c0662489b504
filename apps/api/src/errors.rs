use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::kv::KvError;
use crate::submission::pipeline::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Key-value store error: {0}")]
    Kv(#[from] KvError),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Feedback parse error: {0}")]
    FeedbackParse(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PipelineError> for AppError {
    fn from(error: PipelineError) -> Self {
        // A pipeline error's display text is its step's terminal status line;
        // it doubles as the client-facing message.
        let message = error.to_string();
        match error {
            PipelineError::ResumeUpload(_) | PipelineError::PreviewUpload(_) => {
                AppError::Upload(message)
            }
            PipelineError::PreviewRender(_) => AppError::Render(message),
            PipelineError::Inference(_) => AppError::Inference(message),
            PipelineError::Feedback(_) => AppError::FeedbackParse(message),
            PipelineError::Persist(e) => AppError::Kv(e),
            PipelineError::Encode(e) => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upload(msg) => {
                tracing::error!("Upload error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "UPLOAD_ERROR", msg.clone())
            }
            AppError::Render(msg) => {
                tracing::error!("Render error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR", msg.clone())
            }
            AppError::Kv(e) => {
                tracing::error!("Key-value store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "KV_ERROR",
                    "Error: Failed to save submission".to_string(),
                )
            }
            AppError::Inference(msg) => {
                tracing::error!("Inference error: {msg}");
                (StatusCode::BAD_GATEWAY, "INFERENCE_ERROR", msg.clone())
            }
            AppError::FeedbackParse(msg) => {
                tracing::error!("Feedback parse error: {msg}");
                (StatusCode::BAD_GATEWAY, "FEEDBACK_PARSE_ERROR", msg.clone())
            }
            AppError::Auth(msg) => {
                tracing::error!("Auth error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUTH_ERROR",
                    "Authentication check failed".to_string(),
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
