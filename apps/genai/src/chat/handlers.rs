//! Axum route handlers for the interview chat.

use axum::{extract::State, response::Response, Json};
use serde::Deserialize;

use crate::chat::stream_interview_reply;
use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::models::transcript::TranscriptTurn;
use crate::routes::streaming::text_stream;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatReplyRequest {
    #[serde(flatten)]
    pub job: JobPosting,
    pub resume_text: String,
    #[serde(default)]
    pub chat_history: Vec<TranscriptTurn>,
}

/// POST /api/v1/chat/reply
///
/// Streams the interviewer's next message as plain text.
pub async fn handle_chat_reply(
    State(state): State<AppState>,
    Json(request): Json<ChatReplyRequest>,
) -> Result<Response, AppError> {
    if request.job.job_title.trim().is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }

    let stream = stream_interview_reply(
        state.gateway.as_ref(),
        &request.job,
        &request.resume_text,
        &request.chat_history,
    )
    .await?;

    Ok(text_stream(stream))
}
