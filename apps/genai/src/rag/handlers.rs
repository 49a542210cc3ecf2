//! Axum route handlers for question answering.

use axum::{extract::State, response::Response, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::rag::answer_stream;
use crate::routes::streaming::text_stream;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub question: String,
    #[serde(default)]
    pub is_open_rag: bool,
}

/// POST /api/v1/qa
///
/// `is_open_rag` grounds the answer in the retrieval corpus.
pub async fn handle_qa(
    State(state): State<AppState>,
    Json(request): Json<QaRequest>,
) -> Result<Response, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let stream = answer_stream(
        &state.retriever,
        state.gateway.as_ref(),
        &request.question,
        request.is_open_rag,
    )
    .await?;

    Ok(text_stream(stream))
}
