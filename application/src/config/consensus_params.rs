//! Consensus parameters: how each request is built and reconciled.
//!
//! [`ConsensusParams`] groups the static parameters the consensus use cases
//! apply to every call. These are application-layer concerns, not domain
//! policy.

use quorum_domain::{CallRequest, ConsensusStrategy, EscalationPolicy, OutputSchema};
use std::time::Duration;

/// System prompt used when none is configured
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are one of several independent experts answering the same question. \
Answer precisely and return only the requested JSON.";

#[derive(Debug, Clone)]
pub struct ConsensusParams {
    /// Reconciliation strategy applied when two or more providers answer.
    pub strategy: ConsensusStrategy,
    pub system_prompt: String,
    pub temperature: f32,
    /// Per-provider timeout.
    pub timeout: Duration,
    /// Output contract every answer must satisfy.
    pub output_schema: Option<OutputSchema>,
    /// When set, cheap and balanced tiers escalate to the expensive tier on
    /// weak agreement.
    pub escalation: Option<EscalationPolicy>,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            strategy: ConsensusStrategy::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.2,
            timeout: Duration::from_secs(60),
            output_schema: None,
            escalation: None,
        }
    }
}

impl ConsensusParams {
    // ==================== Builder Methods ====================

    pub fn with_strategy(mut self, strategy: ConsensusStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_output_schema(mut self, schema: Option<OutputSchema>) -> Self {
        self.output_schema = schema;
        self
    }

    pub fn with_escalation(mut self, policy: Option<EscalationPolicy>) -> Self {
        self.escalation = policy;
        self
    }

    /// Build the request for one user prompt.
    pub fn request(&self, user_prompt: impl Into<String>) -> CallRequest {
        let request = CallRequest::new(self.system_prompt.clone(), user_prompt)
            .with_temperature(self.temperature)
            .with_timeout(self.timeout);
        match &self.output_schema {
            Some(schema) => request.with_schema(schema.clone()),
            None => request,
        }
    }
}
