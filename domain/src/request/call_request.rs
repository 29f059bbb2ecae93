//! Call request value object

use super::schema::OutputSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable per-invocation request dispatched to every provider.
///
/// Built fresh for each call and discarded afterwards.
///
/// # Example
///
/// ```
/// use quorum_domain::request::CallRequest;
/// use std::time::Duration;
///
/// let request = CallRequest::new("You are a strict reviewer.", "Is 17 prime?")
///     .with_temperature(0.0)
///     .with_timeout(Duration::from_secs(20));
/// assert_eq!(request.timeout_ms(), 20_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
    pub temperature: f32,
    #[serde(with = "duration_ms", rename = "timeout_ms")]
    pub timeout: Duration,
}

impl CallRequest {
    pub const DEFAULT_TEMPERATURE: f32 = 0.2;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            output_schema: None,
            temperature: Self::DEFAULT_TEMPERATURE,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// The user prompt followed by the output contract, if any.
    ///
    /// Adapters send this text so every backend sees the same structural
    /// instructions regardless of native JSON-mode support.
    pub fn rendered_user_prompt(&self) -> String {
        match &self.output_schema {
            Some(schema) => format!("{}\n\n{}", self.user_prompt, schema.prompt_instructions()),
            None => format!(
                "{}\n\nRespond with a single JSON value and nothing else.",
                self.user_prompt
            ),
        }
    }

    /// Approximate size of the prompt in characters (for cost estimates).
    pub fn prompt_chars(&self) -> usize {
        self.system_prompt.chars().count() + self.user_prompt.chars().count()
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::schema::FieldType;

    #[test]
    fn test_defaults() {
        let request = CallRequest::new("sys", "user");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.timeout_ms(), 60_000);
        assert!(request.output_schema.is_none());
    }

    #[test]
    fn test_temperature_clamped() {
        let request = CallRequest::new("sys", "user").with_temperature(5.0);
        assert_eq!(request.temperature, 2.0);
    }

    #[test]
    fn test_rendered_prompt_includes_schema() {
        let schema = OutputSchema::new().required("answer", FieldType::String);
        let request = CallRequest::new("sys", "What is 2+2?").with_schema(schema);
        let rendered = request.rendered_user_prompt();
        assert!(rendered.starts_with("What is 2+2?"));
        assert!(rendered.contains("\"answer\" (string, required)"));
    }

    #[test]
    fn test_serialize_timeout_as_millis() {
        let request = CallRequest::new("s", "u").with_timeout(Duration::from_millis(1500));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["timeout_ms"], 1500);
    }
}
