use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::FailureReason;
use crate::llm_client::GatewayError;
use crate::retrieval::RetrievalError;
use crate::scoring::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Extraction failed: {0}")]
    Extraction(FailureReason),

    #[error("Field '{field}' could not be coerced: {value}")]
    Coercion { field: &'static str, value: String },

    #[error("Vector store error: {0}")]
    Store(String),
}

impl From<ScoringError> for AppError {
    fn from(e: ScoringError) -> Self {
        match e {
            ScoringError::Gateway(e) => AppError::Gateway(e),
            ScoringError::Extraction(reason) => AppError::Extraction(reason),
            ScoringError::Coercion { field, value } => AppError::Coercion { field, value },
        }
    }
}

impl From<RetrievalError> for AppError {
    fn from(e: RetrievalError) -> Self {
        match e {
            RetrievalError::Gateway(e) => AppError::Gateway(e),
            RetrievalError::InvalidK(k) => {
                AppError::Validation(format!("k must be at least 1, got {k}"))
            }
            other => AppError::Store(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Gateway(e) => {
                tracing::error!("Gateway error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GATEWAY_ERROR",
                    "The inference server could not be reached or returned an error".to_string(),
                )
            }
            AppError::Extraction(reason) => {
                tracing::warn!("Extraction failed: {reason}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    format!("The model did not return a usable evaluation: {reason}"),
                )
            }
            AppError::Coercion { field, value } => {
                tracing::warn!("Coercion failed for '{field}': {value}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "COERCION_FAILED",
                    format!("The model returned an invalid '{field}': {value}"),
                )
            }
            AppError::Store(msg) => {
                tracing::error!("Vector store error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A retrieval store error occurred".to_string(),
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
