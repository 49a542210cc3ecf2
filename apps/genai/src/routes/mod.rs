pub mod health;
pub mod streaming;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{chat, rag, retrieval, scoring};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview chat
        .route("/api/v1/chat/reply", post(chat::handlers::handle_chat_reply))
        // Question answering
        .route("/api/v1/qa", post(rag::handlers::handle_qa))
        .route(
            "/api/v1/rag/documents",
            post(retrieval::handlers::handle_ingest),
        )
        // Scoring
        .route(
            "/api/v1/score/resume",
            post(scoring::handlers::handle_score_resume),
        )
        .route(
            "/api/v1/score/interview",
            post(scoring::handlers::handle_score_interview),
        )
        .with_state(state)
}
