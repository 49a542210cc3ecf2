//! Axum route handlers for the retrieval corpus.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::retrieval::document::DocumentId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub source: String,
    pub ids: Vec<DocumentId>,
}

/// POST /api/v1/rag/documents
pub async fn handle_ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let documents = state
        .retriever
        .ingest(&request.name, &request.content)
        .await?;

    Ok(Json(IngestResponse {
        source: request.name,
        ids: documents.into_iter().map(|d| d.id).collect(),
    }))
}
