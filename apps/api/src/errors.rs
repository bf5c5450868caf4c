use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dataset::DatasetError;
use crate::decode::DecodeError;
use crate::pipeline::ClassificationUnavailable;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Decode failure: {0}")]
    Decode(String),

    #[error("{0}")]
    ClassificationUnavailable(#[from] ClassificationUnavailable),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DecodeError> for AppError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::UnsupportedFormat(ext) => AppError::UnsupportedFormat(ext),
            other => AppError::Decode(other.to_string()),
        }
    }
}

impl From<DatasetError> for AppError {
    fn from(e: DatasetError) -> Self {
        match e {
            DatasetError::Schema(msg) => AppError::Schema(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::UnsupportedFormat(ext) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                format!("Unsupported file format '{ext}'; upload a pdf, docx or doc file"),
            ),
            AppError::Decode(msg) => {
                tracing::warn!("Decode failure: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "DECODE_FAILURE",
                    msg.clone(),
                )
            }
            AppError::ClassificationUnavailable(e) => {
                tracing::warn!("{e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "CLASSIFICATION_UNAVAILABLE",
                    e.to_string(),
                )
            }
            AppError::Schema(msg) => {
                tracing::error!("Dataset schema error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCHEMA_ERROR",
                    msg.clone(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "The resume dataset could not be read".to_string(),
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
