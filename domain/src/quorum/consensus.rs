//! Reconciled consensus results

use super::strategy::{RankEntry, StrategyKind, StrategyOutcome};
use crate::core::error::DomainError;
use serde::Serialize;
use serde_json::Value;

/// Explanation attached when only one provider answered
pub const SINGLE_SURVIVOR_EXPLANATION: &str = "single surviving response";

/// The single answer agreed on by the providers of a profile.
///
/// Can only be built from at least one successful response; constructors
/// reject anything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusResult {
    winning_payload: Value,
    winning_provider: String,
    agreement_ratio: f64,
    agreeing_count: usize,
    participant_count: usize,
    success_count: usize,
    strategy_used: Option<StrategyKind>,
    explanation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cluster_shares: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ranking: Vec<RankEntry>,
}

impl ConsensusResult {
    /// Wrap the outcome of a strategy run over `success_count` responses.
    pub fn from_outcome(
        outcome: StrategyOutcome,
        winning_provider: impl Into<String>,
        strategy: StrategyKind,
        participant_count: usize,
        success_count: usize,
    ) -> Result<Self, DomainError> {
        check_counts(participant_count, success_count)?;
        if !(0.0..=1.0).contains(&outcome.agreement_ratio) {
            return Err(DomainError::InvalidConsensus(format!(
                "agreement ratio {} out of range",
                outcome.agreement_ratio
            )));
        }
        if outcome.agreeing_count == 0 || outcome.agreeing_count > success_count {
            return Err(DomainError::InvalidConsensus(format!(
                "{} agreeing responses out of {} successes",
                outcome.agreeing_count, success_count
            )));
        }
        Ok(Self {
            winning_payload: outcome.winning_payload,
            winning_provider: winning_provider.into(),
            agreement_ratio: outcome.agreement_ratio,
            agreeing_count: outcome.agreeing_count,
            participant_count,
            success_count,
            strategy_used: Some(strategy),
            explanation: outcome.explanation,
            cluster_shares: outcome.cluster_shares,
            ranking: outcome.ranking,
        })
    }

    /// Result for a dispatch where exactly one provider answered.
    pub fn single(
        payload: Value,
        winning_provider: impl Into<String>,
        participant_count: usize,
    ) -> Result<Self, DomainError> {
        check_counts(participant_count, 1)?;
        Ok(Self {
            winning_payload: payload,
            winning_provider: winning_provider.into(),
            agreement_ratio: 1.0,
            agreeing_count: 1,
            participant_count,
            success_count: 1,
            strategy_used: None,
            explanation: SINGLE_SURVIVOR_EXPLANATION.to_string(),
            cluster_shares: Vec::new(),
            ranking: Vec::new(),
        })
    }

    /// A result for one part of a combined answer.
    ///
    /// Counts, ratio and strategy are inherited from the combined result.
    pub fn derived(&self, payload: Value, explanation: impl Into<String>) -> Self {
        Self {
            winning_payload: payload,
            explanation: explanation.into(),
            ranking: Vec::new(),
            ..self.clone()
        }
    }

    pub fn winning_payload(&self) -> &Value {
        &self.winning_payload
    }

    pub fn into_payload(self) -> Value {
        self.winning_payload
    }

    /// `provider/model` whose payload was selected
    pub fn winning_provider(&self) -> &str {
        &self.winning_provider
    }

    pub fn agreement_ratio(&self) -> f64 {
        self.agreement_ratio
    }

    pub fn agreement_percent(&self) -> f64 {
        self.agreement_ratio * 100.0
    }

    pub fn participant_count(&self) -> usize {
        self.participant_count
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    /// `None` when a single surviving response was returned directly
    pub fn strategy_used(&self) -> Option<StrategyKind> {
        self.strategy_used
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn cluster_shares(&self) -> &[f64] {
        &self.cluster_shares
    }

    pub fn ranking(&self) -> &[RankEntry] {
        &self.ranking
    }

    /// Responses in the winning group.
    ///
    /// Under weighted strategies this can be a minority even when the
    /// agreement ratio is high.
    pub fn agreeing_count(&self) -> usize {
        self.agreeing_count
    }
}

fn check_counts(participant_count: usize, success_count: usize) -> Result<(), DomainError> {
    if success_count == 0 {
        return Err(DomainError::InvalidConsensus(
            "consensus requires at least one successful response".to_string(),
        ));
    }
    if success_count > participant_count {
        return Err(DomainError::InvalidConsensus(format!(
            "{} successes out of {} participants",
            success_count, participant_count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::strategy::voting::vote;
    use crate::quorum::strategy::weighted::hybrid_vote;
    use serde_json::json;

    #[test]
    fn test_zero_successes_rejected() {
        let outcome = vote(&[json!(1)]).unwrap();
        let err =
            ConsensusResult::from_outcome(outcome, "openai/gpt-5", StrategyKind::Voting, 2, 0)
                .unwrap_err();
        assert!(matches!(err, DomainError::InvalidConsensus(_)));
        assert!(ConsensusResult::single(json!(1), "openai/gpt-5", 0).is_err());
    }

    #[test]
    fn test_from_outcome() {
        let outcome = vote(&[json!({"x": 1}), json!({"x": 1}), json!({"x": 2})]).unwrap();
        let result = ConsensusResult::from_outcome(
            outcome,
            "gemini/gemini-2.5-pro",
            StrategyKind::Voting,
            3,
            3,
        )
        .unwrap();
        assert_eq!(result.winning_payload(), &json!({"x": 1}));
        assert!((result.agreement_percent() - 66.666).abs() < 0.01);
        assert_eq!(result.strategy_used(), Some(StrategyKind::Voting));
        assert_eq!(result.agreeing_count(), 2);
    }

    #[test]
    fn test_agreeing_count_ignores_weight_share() {
        let payloads = [json!({"x": 1}), json!({"x": 2}), json!({"x": 3})];
        let outcome = hybrid_vote(&payloads, &[0.9, 0.1, 0.1]).unwrap();
        let result = ConsensusResult::from_outcome(
            outcome,
            "anthropic/claude-opus-4-1",
            StrategyKind::Hybrid,
            3,
            3,
        )
        .unwrap();
        assert!(result.agreement_ratio() > 0.8);
        assert_eq!(result.agreeing_count(), 1);
    }

    #[test]
    fn test_agreeing_count_out_of_range_rejected() {
        let mut outcome = vote(&[json!(1), json!(1)]).unwrap();
        outcome.agreeing_count = 3;
        let err =
            ConsensusResult::from_outcome(outcome, "openai/gpt-5", StrategyKind::Voting, 2, 2)
                .unwrap_err();
        assert!(matches!(err, DomainError::InvalidConsensus(_)));
    }

    #[test]
    fn test_single_survivor() {
        let result =
            ConsensusResult::single(json!({"x": 5}), "anthropic/claude-haiku-4-5", 3).unwrap();
        assert_eq!(result.agreement_ratio(), 1.0);
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.agreeing_count(), 1);
        assert_eq!(result.participant_count(), 3);
        assert_eq!(result.strategy_used(), None);
        assert_eq!(result.explanation(), SINGLE_SURVIVOR_EXPLANATION);
    }

    #[test]
    fn test_derived_keeps_counts() {
        let parent =
            ConsensusResult::single(json!({"answers": [1, 2]}), "openai/gpt-5", 2).unwrap();
        let part = parent.derived(json!(2), "answer 2 of 2");
        assert_eq!(part.winning_payload(), &json!(2));
        assert_eq!(part.participant_count(), 2);
        assert_eq!(part.explanation(), "answer 2 of 2");
    }

    #[test]
    fn test_serialized_shape() {
        let result = ConsensusResult::single(json!("ok"), "openai/gpt-5", 1).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["strategy_used"], Value::Null);
        assert_eq!(json["success_count"], 1);
        assert_eq!(json["agreeing_count"], 1);
        assert!(json.get("ranking").is_none());
    }
}
