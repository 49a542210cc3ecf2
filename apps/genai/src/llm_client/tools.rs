//! Function-calling tool schemas.
//!
//! Schemas are `'static` constants so the definition sent to the model and the
//! fields the caller reads back can never drift apart.

use serde_json::{json, Map, Value};

/// Parameter types offered to the model. Numeric judgments travel
/// string-encoded and are parsed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
        }
    }

    /// Brings `value` to this type, or `None` if it cannot be.
    /// A bare number is accepted for a string field and kept in its string form.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (FieldType::String, Value::String(_)) => Some(value.clone()),
            (FieldType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            _ => None,
        }
    }
}

/// A single named parameter of a tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolField {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
    /// Empty means unconstrained.
    pub allowed: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [ToolField],
    pub required: &'static [&'static str],
}

impl ToolSchema {
    pub fn field(&self, name: &str) -> Option<&ToolField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// JSON wire form: `{type:"function", function:{name, description, parameters}}`.
    pub fn to_wire(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            let mut property = json!({
                "type": field.field_type.as_str(),
                "description": field.description,
            });
            if !field.allowed.is_empty() {
                property["enum"] = json!(field.allowed);
            }
            properties.insert(field.name.to_string(), property);
        }

        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": self.required,
                }
            }
        })
    }

    /// `tool_choice` value that pins the model to this function.
    pub fn forced_choice(&self) -> Value {
        json!({
            "type": "function",
            "function": { "name": self.name }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP_TOOL: ToolSchema = ToolSchema {
        name: "lookup",
        description: "Looks something up.",
        fields: &[
            ToolField {
                name: "term",
                field_type: FieldType::String,
                description: "What to look up",
                allowed: &[],
            },
            ToolField {
                name: "scope",
                field_type: FieldType::String,
                description: "Where to look",
                allowed: &["local", "global"],
            },
        ],
        required: &["term"],
    };

    #[test]
    fn test_wire_format_shape() {
        let wire = LOOKUP_TOOL.to_wire();
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "lookup");
        assert_eq!(wire["function"]["parameters"]["type"], "object");
        assert_eq!(wire["function"]["parameters"]["required"], json!(["term"]));
        assert_eq!(
            wire["function"]["parameters"]["properties"]["term"]["type"],
            "string"
        );
    }

    #[test]
    fn test_enum_only_emitted_when_constrained() {
        let wire = LOOKUP_TOOL.to_wire();
        let properties = &wire["function"]["parameters"]["properties"];
        assert!(properties["term"].get("enum").is_none());
        assert_eq!(properties["scope"]["enum"], json!(["local", "global"]));
    }

    #[test]
    fn test_forced_choice_names_function() {
        assert_eq!(LOOKUP_TOOL.forced_choice()["function"]["name"], "lookup");
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(FieldType::String.coerce(&json!("0.4")), Some(json!("0.4")));
        assert_eq!(FieldType::String.coerce(&json!(0.4)), Some(json!("0.4")));
        assert_eq!(FieldType::String.coerce(&json!(true)), None);
        assert_eq!(FieldType::String.coerce(&json!({"a": 1})), None);
        assert_eq!(FieldType::String.coerce(&json!(["x"])), None);
    }

    #[test]
    fn test_field_lookup() {
        assert!(LOOKUP_TOOL.field("scope").is_some());
        assert!(LOOKUP_TOOL.field("missing").is_none());
    }
}
