//! Axum route handlers for the Scoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::models::transcript::TranscriptTurn;
use crate::scoring::{score_interview, score_resume, Recommendation, ScoreResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeScoreRequest {
    #[serde(flatten)]
    pub job: JobPosting,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewScoreRequest {
    #[serde(flatten)]
    pub job: JobPosting,
    pub chat_history: Vec<TranscriptTurn>,
}

#[derive(Debug, Serialize)]
pub struct ResumeScoreResponse {
    pub resume_score: f64,
    pub comment: String,
    pub recommendation: Recommendation,
}

#[derive(Debug, Serialize)]
pub struct InterviewScoreResponse {
    pub interview_score: f64,
    pub comment: String,
    pub recommendation: Recommendation,
}

impl From<ScoreResult> for ResumeScoreResponse {
    fn from(result: ScoreResult) -> Self {
        Self {
            resume_score: result.score,
            comment: result.reason,
            recommendation: result.recommendation,
        }
    }
}

impl From<ScoreResult> for InterviewScoreResponse {
    fn from(result: ScoreResult) -> Self {
        Self {
            interview_score: result.score,
            comment: result.reason,
            recommendation: result.recommendation,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/score/resume
pub async fn handle_score_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeScoreRequest>,
) -> Result<Json<ResumeScoreResponse>, AppError> {
    validate_job(&request.job)?;
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let result = score_resume(state.gateway.as_ref(), &request.job, &request.resume_text).await?;
    Ok(Json(result.into()))
}

/// POST /api/v1/score/interview
///
/// An empty chat history is still scored; the model sees an empty transcript.
pub async fn handle_score_interview(
    State(state): State<AppState>,
    Json(request): Json<InterviewScoreRequest>,
) -> Result<Json<InterviewScoreResponse>, AppError> {
    validate_job(&request.job)?;

    let result =
        score_interview(state.gateway.as_ref(), &request.job, &request.chat_history).await?;
    Ok(Json(result.into()))
}

fn validate_job(job: &JobPosting) -> Result<(), AppError> {
    if job.job_title.trim().is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_reads_flat_job_fields() {
        let request: InterviewScoreRequest = serde_json::from_value(json!({
            "job_title": "SRE",
            "job_description": "Keep production healthy.",
            "job_requirements": "On-call",
            "chat_history": [
                { "sender": "AI", "content": "Hello!" },
                { "sender": "CANDIDATE", "content": "Hi." }
            ]
        }))
        .unwrap();
        assert_eq!(request.job.job_title, "SRE");
        assert_eq!(request.chat_history.len(), 2);
    }

    #[test]
    fn test_response_field_names() {
        let result = ScoreResult {
            score: 0.2,
            reason: "No backend experience".to_string(),
            recommendation: Recommendation::NotRecommend,
        };
        let body = serde_json::to_value(ResumeScoreResponse::from(result.clone())).unwrap();
        assert_eq!(
            body,
            json!({
                "resume_score": 0.2,
                "comment": "No backend experience",
                "recommendation": "NOT_RECOMMEND"
            })
        );
        let body = serde_json::to_value(InterviewScoreResponse::from(result)).unwrap();
        assert_eq!(body["interview_score"], 0.2);
    }

    #[test]
    fn test_blank_title_rejected() {
        let job = JobPosting {
            job_title: "  ".to_string(),
            job_description: String::new(),
            job_requirements: String::new(),
        };
        assert!(matches!(validate_job(&job), Err(AppError::Validation(_))));
    }
}
