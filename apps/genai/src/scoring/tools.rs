//! Tool schemas for the two evaluation kinds. Both require the same three fields.

use crate::llm_client::tools::{FieldType, ToolField, ToolSchema};

pub const FIELD_SCORE: &str = "score";
pub const FIELD_REASON: &str = "score_reason";
pub const FIELD_RECOMMENDATION: &str = "recommendation";

pub const RECOMMENDATION_VALUES: &[&str] = &["RECOMMEND", "CONSIDER", "NOT_RECOMMEND"];

const REQUIRED: &[&str] = &[FIELD_SCORE, FIELD_REASON, FIELD_RECOMMENDATION];

pub const RESUME_SCORE_TOOL: ToolSchema = ToolSchema {
    name: "score_resume",
    description:
        "Scores a resume against job title, job description, job requirements, and resume text.",
    fields: &[
        ToolField {
            name: FIELD_SCORE,
            field_type: FieldType::String,
            description: "The resume score from 0 to 1, use float number",
            allowed: &[],
        },
        ToolField {
            name: FIELD_REASON,
            field_type: FieldType::String,
            description: "The reason for the resume score",
            allowed: &[],
        },
        ToolField {
            name: FIELD_RECOMMENDATION,
            field_type: FieldType::String,
            description: "The recommendation for the resume score, choose from RECOMMEND, CONSIDER, NOT_RECOMMEND",
            allowed: RECOMMENDATION_VALUES,
        },
    ],
    required: REQUIRED,
};

pub const INTERVIEW_SCORE_TOOL: ToolSchema = ToolSchema {
    name: "score_interview",
    description:
        "Scores an interview chat against job title, job description, job requirements, and chat history.",
    fields: &[
        ToolField {
            name: FIELD_SCORE,
            field_type: FieldType::String,
            description: "The interview score from 0 to 1, use float number",
            allowed: &[],
        },
        ToolField {
            name: FIELD_REASON,
            field_type: FieldType::String,
            description: "The reason for the interview score",
            allowed: &[],
        },
        ToolField {
            name: FIELD_RECOMMENDATION,
            field_type: FieldType::String,
            description: "The recommendation for the interview score, choose from RECOMMEND, CONSIDER, NOT_RECOMMEND",
            allowed: RECOMMENDATION_VALUES,
        },
    ],
    required: REQUIRED,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_schema_field_is_required() {
        for tool in [RESUME_SCORE_TOOL, INTERVIEW_SCORE_TOOL] {
            for field in tool.fields {
                assert!(tool.required.contains(&field.name), "{}", field.name);
            }
        }
    }

    #[test]
    fn test_resume_tool_wire_form() {
        let wire = RESUME_SCORE_TOOL.to_wire();
        assert_eq!(wire["function"]["name"], "score_resume");
        assert_eq!(
            wire["function"]["parameters"]["required"],
            json!(["score", "score_reason", "recommendation"])
        );
        assert_eq!(
            wire["function"]["parameters"]["properties"]["recommendation"]["enum"],
            json!(["RECOMMEND", "CONSIDER", "NOT_RECOMMEND"])
        );
    }
}
