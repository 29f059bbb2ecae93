//! Cheap-first escalation policy

use super::consensus::ConsensusResult;
use super::rule::QuorumRule;
use serde::{Deserialize, Serialize};

/// Decides whether a consensus from a cheap profile is good enough or the
/// request should be repeated on a premium profile.
///
/// Escalates when fewer than `min_successes` providers answered, or when the
/// winning group does not satisfy `rule`.
///
/// # Example
///
/// ```
/// use quorum_domain::quorum::{ConsensusResult, EscalationPolicy};
/// use serde_json::json;
///
/// let policy = EscalationPolicy::default();
/// let lone = ConsensusResult::single(json!({"x": 5}), "openai/gpt-5-mini", 3).unwrap();
/// assert!(policy.should_escalate(&lone));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationPolicy {
    pub rule: QuorumRule,
    pub min_successes: usize,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            rule: QuorumRule::Majority,
            min_successes: 2,
        }
    }
}

impl EscalationPolicy {
    pub fn new(rule: QuorumRule, min_successes: usize) -> Self {
        Self {
            rule,
            min_successes,
        }
    }

    pub fn should_escalate(&self, result: &ConsensusResult) -> bool {
        self.reason(result).is_some()
    }

    /// Why the result needs escalation, or `None` if it is acceptable.
    pub fn reason(&self, result: &ConsensusResult) -> Option<String> {
        if result.success_count() < self.min_successes {
            return Some(format!(
                "only {} of {} providers answered (need {})",
                result.success_count(),
                result.participant_count(),
                self.min_successes
            ));
        }
        let agreeing = result.agreeing_count();
        if !self.rule.is_satisfied(agreeing, result.success_count()) {
            return Some(format!(
                "{}/{} agreeing responses do not meet {}",
                agreeing,
                result.success_count(),
                self.rule
            ));
        }
        None
    }
}
