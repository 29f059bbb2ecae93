//! Per-provider call results

use crate::providers::ProviderDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a single provider call produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Succeeded,
    Failed,
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallStatus::Succeeded => write!(f, "Succeeded"),
            CallStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Payload or error detail of a call; exactly one of the two exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallOutcome {
    Succeeded { payload: Value },
    Failed { error_detail: String },
}

/// Result of dispatching one request to one provider.
///
/// Produced by the orchestrator, folded into a consensus, then discarded.
///
/// # Example
///
/// ```
/// use quorum_domain::providers::{ProviderDescriptor, ProviderFamily};
/// use quorum_domain::quorum::{CallResult, CallStatus};
/// use serde_json::json;
///
/// let d = ProviderDescriptor::new(ProviderFamily::OpenAi, "gpt-4.1");
/// let ok = CallResult::succeeded(&d, json!({"x": 1}), 120);
/// assert_eq!(ok.status(), CallStatus::Succeeded);
/// assert!(ok.error_detail().is_none());
///
/// let timed_out = CallResult::timeout(&d, 30_000);
/// assert_eq!(timed_out.error_detail(), Some("timeout"));
/// assert!(timed_out.payload().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    pub provider_id: String,
    pub model_id: String,
    #[serde(flatten)]
    pub outcome: CallOutcome,
    pub elapsed_ms: u64,
}

impl CallResult {
    pub const TIMEOUT_DETAIL: &'static str = "timeout";

    pub fn succeeded(descriptor: &ProviderDescriptor, payload: Value, elapsed_ms: u64) -> Self {
        Self {
            provider_id: descriptor.provider_id().to_string(),
            model_id: descriptor.model_id.clone(),
            outcome: CallOutcome::Succeeded { payload },
            elapsed_ms,
        }
    }

    pub fn failed(
        descriptor: &ProviderDescriptor,
        error_detail: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            provider_id: descriptor.provider_id().to_string(),
            model_id: descriptor.model_id.clone(),
            outcome: CallOutcome::Failed {
                error_detail: error_detail.into(),
            },
            elapsed_ms,
        }
    }

    pub fn timeout(descriptor: &ProviderDescriptor, elapsed_ms: u64) -> Self {
        Self::failed(descriptor, Self::TIMEOUT_DETAIL, elapsed_ms)
    }

    pub fn status(&self) -> CallStatus {
        match self.outcome {
            CallOutcome::Succeeded { .. } => CallStatus::Succeeded,
            CallOutcome::Failed { .. } => CallStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == CallStatus::Succeeded
    }

    pub fn payload(&self) -> Option<&Value> {
        match &self.outcome {
            CallOutcome::Succeeded { payload } => Some(payload),
            CallOutcome::Failed { .. } => None,
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match &self.outcome {
            CallOutcome::Succeeded { .. } => None,
            CallOutcome::Failed { error_detail } => Some(error_detail),
        }
    }

    /// `provider/model` label used in logs and explanations.
    pub fn source(&self) -> String {
        format!("{}/{}", self.provider_id, self.model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderFamily;
    use serde_json::json;

    fn descriptor() -> ProviderDescriptor {
        ProviderDescriptor::new(ProviderFamily::Anthropic, "claude-sonnet-4-5")
    }

    #[test]
    fn test_payload_iff_succeeded() {
        let ok = CallResult::succeeded(&descriptor(), json!({"x": 1}), 10);
        assert!(ok.is_success());
        assert_eq!(ok.payload(), Some(&json!({"x": 1})));

        let failed = CallResult::failed(&descriptor(), "HTTP 500", 10);
        assert!(!failed.is_success());
        assert!(failed.payload().is_none());
        assert_eq!(failed.error_detail(), Some("HTTP 500"));
    }

    #[test]
    fn test_serialized_shape() {
        let failed = CallResult::timeout(&descriptor(), 5);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error_detail"], "timeout");
        assert_eq!(json["provider_id"], "anthropic");
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_source_label() {
        let ok = CallResult::succeeded(&descriptor(), json!(1), 0);
        assert_eq!(ok.source(), "anthropic/claude-sonnet-4-5");
    }
}
