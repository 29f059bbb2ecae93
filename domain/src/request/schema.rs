//! Structural output contract for provider responses.
//!
//! An [`OutputSchema`] lists the top-level fields a payload must (or may)
//! carry and their primitive types. It is deliberately smaller than JSON
//! Schema: every adapter can render it into prompt text, and
//! [`OutputSchema::validate`] decides whether a response is well-formed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Primitive type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Any,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Any => "any",
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
            FieldType::Any => true,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One top-level field of an [`OutputSchema`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// Reason a payload does not honor its [`OutputSchema`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{field}` should be {expected}, got {actual}")]
    WrongType {
        field: String,
        expected: FieldType,
        actual: &'static str,
    },
}

/// Structural contract every adapter must make its backend honor.
///
/// # Example
///
/// ```
/// use quorum_domain::request::{FieldType, OutputSchema};
/// use serde_json::json;
///
/// let schema = OutputSchema::new()
///     .required("verdict", FieldType::String)
///     .optional("score", FieldType::Number);
///
/// assert!(schema.validate(&json!({"verdict": "ok"})).is_ok());
/// assert!(schema.validate(&json!({"score": 3})).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub fields: Vec<SchemaField>,
}

impl OutputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            field_type,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            field_type,
            required: false,
        });
        self
    }

    /// Check a payload against the contract, reporting the first violation.
    ///
    /// Unknown extra fields are allowed. Optional fields that are present
    /// must still have the declared type; `null` counts as absent.
    pub fn validate(&self, payload: &Value) -> Result<(), SchemaViolation> {
        let Some(object) = payload.as_object() else {
            return Err(SchemaViolation::NotAnObject(json_type_name(payload)));
        };

        for field in &self.fields {
            match object.get(&field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(SchemaViolation::MissingField(field.name.clone()));
                    }
                }
                Some(value) if !field.field_type.matches(value) => {
                    return Err(SchemaViolation::WrongType {
                        field: field.name.clone(),
                        expected: field.field_type,
                        actual: json_type_name(value),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Plain-text instructions describing the contract for the prompt.
    pub fn prompt_instructions(&self) -> String {
        let mut text = String::from(
            "Respond with a single JSON object and nothing else. The object must have these fields:\n",
        );
        for field in &self.fields {
            text.push_str(&format!(
                "- \"{}\" ({}, {})\n",
                field.name,
                field.field_type,
                if field.required { "required" } else { "optional" }
            ));
        }
        text
    }

    /// Equivalent JSON Schema document, for backends with native structured output.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let property = match field.field_type {
                FieldType::Any => json!({}),
                other => json!({ "type": other.as_str() }),
            };
            properties.insert(field.name.clone(), property);
        }
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> OutputSchema {
        OutputSchema::new()
            .required("answer", FieldType::String)
            .required("count", FieldType::Integer)
            .optional("tags", FieldType::Array)
    }

    #[test]
    fn test_valid_payload() {
        let payload = json!({"answer": "yes", "count": 3, "extra": true});
        assert!(schema().validate(&payload).is_ok());
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(
            schema().validate(&json!([1, 2])),
            Err(SchemaViolation::NotAnObject("array"))
        );
    }

    #[test]
    fn test_missing_required_field() {
        assert_eq!(
            schema().validate(&json!({"answer": "yes"})),
            Err(SchemaViolation::MissingField("count".to_string()))
        );
        assert_eq!(
            schema().validate(&json!({"answer": "yes", "count": null})),
            Err(SchemaViolation::MissingField("count".to_string()))
        );
    }

    #[test]
    fn test_wrong_type() {
        let err = schema()
            .validate(&json!({"answer": "yes", "count": 2.5}))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::WrongType {
                field: "count".to_string(),
                expected: FieldType::Integer,
                actual: "number",
            }
        );
    }

    #[test]
    fn test_optional_field_type_checked_when_present() {
        let err = schema()
            .validate(&json!({"answer": "a", "count": 1, "tags": "x"}))
            .unwrap_err();
        assert!(matches!(err, SchemaViolation::WrongType { .. }));
        assert!(
            schema()
                .validate(&json!({"answer": "a", "count": 1, "tags": null}))
                .is_ok()
        );
    }

    #[test]
    fn test_to_json_schema() {
        let doc = schema().to_json_schema();
        assert_eq!(doc["type"], "object");
        assert_eq!(doc["properties"]["count"]["type"], "integer");
        assert_eq!(doc["required"], json!(["answer", "count"]));
    }

    #[test]
    fn test_deserialize_schema_defaults_required() {
        let schema: OutputSchema =
            serde_json::from_str(r#"{"fields":[{"name":"x","type":"number"}]}"#).unwrap();
        assert!(schema.fields[0].required);
    }
}
