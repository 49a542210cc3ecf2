//! Structured extraction: turns a forced function call into a validated field map.
//!
//! `extract` makes exactly one tool chat. The outcome is either a complete
//! `StructuredResponse` (every required field present, declared types and enum
//! constraints met) or an `Extraction::Failure` carrying the raw response.
//! Nothing in between is ever handed to the caller, and no defaults are guessed.
//!
//! Transport problems are not extraction failures: they come back as
//! `Err(GatewayError)` so callers can tell "the model answered badly" from
//! "the model could not be reached".

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{GatewayError, ModelGateway, ToolSchema};

/// Arguments of a successful function call, keyed by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredResponse {
    fields: Map<String, Value>,
}

impl StructuredResponse {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("response contains no function call")]
    NoFunctionCall,

    #[error("model called '{0}' instead of the offered function")]
    WrongFunction(String),

    #[error("function call arguments are not a JSON object")]
    ArgumentsNotObject,

    #[error("required field '{0}' is missing")]
    MissingField(String),

    #[error("field '{field}' is not a valid {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("field '{field}' has value {value}, which is not one of the allowed values")]
    NotAllowed { field: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Success(StructuredResponse),
    Failure { reason: FailureReason, raw: Value },
}

/// Calls the model once with `tool` forced and validates the function call.
pub async fn extract(
    gateway: &dyn ModelGateway,
    system_prompt: &str,
    user_message: &str,
    tool: &ToolSchema,
) -> Result<Extraction, GatewayError> {
    let raw = gateway
        .chat_with_tools(system_prompt, user_message, tool)
        .await?;

    let extraction = interpret(raw, tool);
    match &extraction {
        Extraction::Success(response) => {
            debug!(
                "Extraction via '{}' succeeded with {} fields",
                tool.name,
                response.fields.len()
            );
        }
        Extraction::Failure { reason, raw } => {
            warn!(
                tool = tool.name,
                raw = %raw,
                "Extraction failed: {reason}"
            );
        }
    }
    Ok(extraction)
}

/// Validates a raw tool chat response against `tool`.
pub fn interpret(raw: Value, tool: &ToolSchema) -> Extraction {
    match validate(&raw, tool) {
        Ok(fields) => Extraction::Success(StructuredResponse { fields }),
        Err(reason) => Extraction::Failure { reason, raw },
    }
}

fn validate(raw: &Value, tool: &ToolSchema) -> Result<Map<String, Value>, FailureReason> {
    let function = raw
        .pointer("/message/tool_calls/0/function")
        .ok_or(FailureReason::NoFunctionCall)?;

    if let Some(name) = function.get("name").and_then(Value::as_str) {
        if name != tool.name {
            return Err(FailureReason::WrongFunction(name.to_string()));
        }
    }

    let mut fields = match function.get("arguments") {
        Some(Value::Object(map)) => map.clone(),
        // OpenAI-compatible servers deliver arguments as a JSON-encoded string
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Object(map)) => map,
            _ => return Err(FailureReason::ArgumentsNotObject),
        },
        _ => return Err(FailureReason::ArgumentsNotObject),
    };

    for required in tool.required {
        match fields.get(*required) {
            None | Some(Value::Null) => {
                return Err(FailureReason::MissingField(required.to_string()))
            }
            Some(_) => {}
        }
    }

    for (name, value) in fields.iter_mut() {
        let Some(field) = tool.field(name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        *value = field
            .field_type
            .coerce(value)
            .ok_or_else(|| FailureReason::WrongType {
                field: name.clone(),
                expected: field.field_type.as_str(),
            })?;

        if field.allowed.is_empty() {
            continue;
        }
        let permitted = value
            .as_str()
            .map(|s| field.allowed.iter().any(|allowed| *allowed == s))
            .unwrap_or(false);
        if !permitted {
            return Err(FailureReason::NotAllowed {
                field: name.clone(),
                value: value.to_string(),
            });
        }
    }

    Ok(fields)
}
