//! Provider adapter port
//!
//! Defines the interface for submitting a structured request to one model
//! serving backend. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use quorum_domain::{CallRequest, ProviderFamily, SchemaViolation};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to a provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    #[error("Timeout")]
    Timeout,
}

impl ProviderError {
    /// Whether repeating the same request may succeed.
    ///
    /// Transport failures, timeouts, 429, 5xx and unusable bodies are
    /// retried. Missing credentials and other 4xx statuses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::MissingCredential(_) => false,
            ProviderError::Http { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Transport(_)
            | ProviderError::MalformedResponse(_)
            | ProviderError::SchemaViolation(_)
            | ProviderError::Timeout => true,
        }
    }
}

/// One backend family (Anthropic, OpenAI, Gemini, ...)
///
/// `submit` returns the structured payload already extracted from the
/// backend's reply and validated against the request's output schema.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn family(&self) -> ProviderFamily;

    /// Whether the adapter can be used. Must not perform network I/O.
    fn is_available(&self) -> bool;

    async fn submit(&self, model_id: &str, request: &CallRequest) -> Result<Value, ProviderError>;
}
