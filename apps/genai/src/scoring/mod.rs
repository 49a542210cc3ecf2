//! Resume and interview scoring on top of structured extraction.
//!
//! Both operations render a fixed prompt, force the matching score tool and
//! coerce the three returned fields into a `ScoreResult`. A failed extraction
//! or an unusable score is an error, never a low score.
//!
//! Scores that parse but fall outside [0.0, 1.0] are rejected as coercion
//! errors rather than clamped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::extraction::{extract, Extraction, FailureReason, StructuredResponse};
use crate::llm_client::{GatewayError, ModelGateway, ToolSchema};
use crate::models::job::JobPosting;
use crate::models::transcript::{flatten_transcript, TranscriptTurn};

pub mod handlers;
pub mod prompts;
pub mod tools;

use prompts::{
    INTERVIEW_SCORE_PROMPT_TEMPLATE, INTERVIEW_SCORE_SYSTEM, RESUME_SCORE_PROMPT_TEMPLATE,
    RESUME_SCORE_SYSTEM,
};
use tools::{
    FIELD_REASON, FIELD_RECOMMENDATION, FIELD_SCORE, INTERVIEW_SCORE_TOOL, RESUME_SCORE_TOOL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Recommend,
    Consider,
    NotRecommend,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Recommend => "RECOMMEND",
            Recommendation::Consider => "CONSIDER",
            Recommendation::NotRecommend => "NOT_RECOMMEND",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RECOMMEND" => Ok(Recommendation::Recommend),
            "CONSIDER" => Ok(Recommendation::Consider),
            "NOT_RECOMMEND" => Ok(Recommendation::NotRecommend),
            _ => Err(()),
        }
    }
}

/// Outcome of a successful evaluation. `score` is always within [0.0, 1.0].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub reason: String,
    pub recommendation: Recommendation,
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Model did not return a usable evaluation: {0}")]
    Extraction(FailureReason),

    #[error("Field '{field}' could not be coerced: {value}")]
    Coercion { field: &'static str, value: String },
}

pub async fn score_resume(
    gateway: &dyn ModelGateway,
    job: &JobPosting,
    resume_text: &str,
) -> Result<ScoreResult, ScoringError> {
    let prompt = job.render(RESUME_SCORE_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
    evaluate(gateway, RESUME_SCORE_SYSTEM, &prompt, &RESUME_SCORE_TOOL).await
}

pub async fn score_interview(
    gateway: &dyn ModelGateway,
    job: &JobPosting,
    transcript: &[TranscriptTurn],
) -> Result<ScoreResult, ScoringError> {
    let chat_history = flatten_transcript(transcript);
    let prompt = job.render(
        INTERVIEW_SCORE_PROMPT_TEMPLATE,
        &[("chat_history", chat_history.as_str())],
    );
    evaluate(gateway, INTERVIEW_SCORE_SYSTEM, &prompt, &INTERVIEW_SCORE_TOOL).await
}

async fn evaluate(
    gateway: &dyn ModelGateway,
    system: &str,
    prompt: &str,
    tool: &ToolSchema,
) -> Result<ScoreResult, ScoringError> {
    match extract(gateway, system, prompt, tool).await? {
        Extraction::Success(response) => {
            let result = coerce(&response)?;
            info!(
                "{} scored {:.2} ({})",
                tool.name, result.score, result.recommendation
            );
            Ok(result)
        }
        Extraction::Failure { reason, .. } => Err(ScoringError::Extraction(reason)),
    }
}

fn coerce(response: &StructuredResponse) -> Result<ScoreResult, ScoringError> {
    let score = coerce_score(response.get(FIELD_SCORE))?;

    let reason = response
        .str_field(FIELD_REASON)
        .ok_or_else(|| coercion_error(FIELD_REASON, response.get(FIELD_REASON)))?
        .to_string();

    let recommendation = response
        .str_field(FIELD_RECOMMENDATION)
        .and_then(|s| s.parse::<Recommendation>().ok())
        .ok_or_else(|| {
            coercion_error(FIELD_RECOMMENDATION, response.get(FIELD_RECOMMENDATION))
        })?;

    Ok(ScoreResult {
        score,
        reason,
        recommendation,
    })
}

/// Accepts a string-encoded float (the declared type) or a bare JSON number.
fn coerce_score(value: Option<&Value>) -> Result<f64, ScoringError> {
    let parsed = match value {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };

    match parsed {
        Some(score) if score.is_finite() && (0.0..=1.0).contains(&score) => Ok(score),
        _ => Err(coercion_error(FIELD_SCORE, value)),
    }
}

fn coercion_error(field: &'static str, value: Option<&Value>) -> ScoringError {
    ScoringError::Coercion {
        field,
        value: value.map(Value::to_string).unwrap_or_else(|| "null".to_string()),
    }
}
