//! Consensus configuration from TOML (`[consensus]` and `[escalation]` sections)

use super::ConfigValidationError;
use quorum_domain::quorum::strategy::ranking::RankingWeights;
use quorum_domain::quorum::strategy::{DEFAULT_CONFIDENCE_FIELD, DEFAULT_MAX_COMPARE_CHARS};
use quorum_domain::{ConsensusStrategy, EscalationPolicy, OutputSchema, QuorumRule, StrategyKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw `[consensus]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Strategy name: voting, weighted-voting, hybrid, committee, ranking, augmented
    pub strategy: String,
    /// Similarity threshold for committee and augmented strategies
    pub threshold: f64,
    /// Longest prefix compared by edit distance
    pub max_compare_chars: usize,
    /// Per-provider (or per-model) weights for weighted voting
    pub weights: BTreeMap<String, f64>,
    pub default_weight: f64,
    /// Payload field read as confidence by the hybrid strategy
    pub confidence_field: String,
    /// Criterion weights for the ranking strategy
    pub ranking: RankingWeights,
    pub temperature: f32,
    /// Per-provider timeout in seconds
    pub timeout_secs: u64,
    /// Overrides the built-in system prompt
    pub system_prompt: Option<String>,
    /// Output contract every answer must satisfy
    pub output_schema: Option<OutputSchema>,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Voting.as_str().to_string(),
            threshold: 0.8,
            max_compare_chars: DEFAULT_MAX_COMPARE_CHARS,
            weights: BTreeMap::new(),
            default_weight: 1.0,
            confidence_field: DEFAULT_CONFIDENCE_FIELD.to_string(),
            ranking: RankingWeights::default(),
            temperature: 0.2,
            timeout_secs: 60,
            system_prompt: None,
            output_schema: None,
        }
    }
}

impl FileConsensusConfig {
    pub fn parse_kind(&self) -> Result<StrategyKind, ConfigValidationError> {
        self.strategy
            .parse()
            .map_err(|_| ConfigValidationError::UnknownStrategy(self.strategy.clone()))
    }

    /// Build the configured strategy, using `kind` instead of the file's choice when given.
    pub fn to_strategy(
        &self,
        kind: Option<StrategyKind>,
    ) -> Result<ConsensusStrategy, ConfigValidationError> {
        let kind = match kind {
            Some(kind) => kind,
            None => self.parse_kind()?,
        };
        Ok(match kind {
            StrategyKind::Voting => ConsensusStrategy::Voting,
            StrategyKind::WeightedVoting => ConsensusStrategy::WeightedVoting {
                weights: self.weights.clone(),
                default_weight: self.default_weight,
            },
            StrategyKind::Hybrid => ConsensusStrategy::Hybrid {
                confidence_field: self.confidence_field.clone(),
            },
            StrategyKind::Committee => ConsensusStrategy::Committee {
                threshold: self.threshold,
                max_compare_chars: self.max_compare_chars,
            },
            StrategyKind::Ranking => ConsensusStrategy::Ranking {
                weights: self.ranking,
            },
            StrategyKind::Augmented => ConsensusStrategy::Augmented {
                threshold: self.threshold,
                max_compare_chars: self.max_compare_chars,
            },
        })
    }

    pub(super) fn validate(&self) -> Result<(), ConfigValidationError> {
        self.parse_kind()?;

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigValidationError::InvalidThreshold(self.threshold));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigValidationError::InvalidTemperature(self.temperature));
        }
        if self.default_weight < 0.0 {
            return Err(ConfigValidationError::NegativeWeight {
                name: "default_weight".to_string(),
                weight: self.default_weight,
            });
        }
        if let Some((name, weight)) = self.weights.iter().find(|(_, w)| **w < 0.0) {
            return Err(ConfigValidationError::NegativeWeight {
                name: name.clone(),
                weight: *weight,
            });
        }
        Ok(())
    }
}

/// Raw `[escalation]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEscalationConfig {
    /// Retry weak cheap-tier results on the expensive tier
    pub enabled: bool,
    /// Agreement rule the winning group must satisfy
    pub rule: QuorumRule,
    /// Fewest surviving responses accepted without escalating
    pub min_successes: usize,
}

impl Default for FileEscalationConfig {
    fn default() -> Self {
        let policy = EscalationPolicy::default();
        Self {
            enabled: false,
            rule: policy.rule,
            min_successes: policy.min_successes,
        }
    }
}

impl FileEscalationConfig {
    pub fn policy(&self) -> Option<EscalationPolicy> {
        self.enabled
            .then(|| EscalationPolicy::new(self.rule, self.min_successes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_voting() {
        let config = FileConsensusConfig::default();
        assert_eq!(config.parse_kind().unwrap(), StrategyKind::Voting);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weighted_strategy_carries_weights() {
        let config: FileConsensusConfig = toml::from_str(
            r#"
strategy = "weighted_voting"
default_weight = 0.5

[weights]
anthropic = 2.0
"gpt-4.1" = 1.5
"#,
        )
        .unwrap();

        match config.to_strategy(None).unwrap() {
            ConsensusStrategy::WeightedVoting {
                weights,
                default_weight,
            } => {
                assert_eq!(weights.get("anthropic"), Some(&2.0));
                assert_eq!(weights.get("gpt-4.1"), Some(&1.5));
                assert_eq!(default_weight, 0.5);
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn test_kind_override_wins() {
        let config = FileConsensusConfig {
            threshold: 0.6,
            ..Default::default()
        };
        assert_eq!(
            config.to_strategy(Some(StrategyKind::Committee)).unwrap(),
            ConsensusStrategy::Committee {
                threshold: 0.6,
                max_compare_chars: DEFAULT_MAX_COMPARE_CHARS,
            }
        );
    }

    #[test]
    fn test_validation_errors() {
        let unknown = FileConsensusConfig {
            strategy: "plurality".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            unknown.validate(),
            Err(ConfigValidationError::UnknownStrategy(_))
        ));

        let threshold = FileConsensusConfig {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            threshold.validate(),
            Err(ConfigValidationError::InvalidThreshold(_))
        ));

        let timeout = FileConsensusConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            timeout.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));

        let mut weights = FileConsensusConfig::default();
        weights.weights.insert("openai".to_string(), -1.0);
        assert!(matches!(
            weights.validate(),
            Err(ConfigValidationError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn test_escalation_disabled_by_default() {
        assert_eq!(FileEscalationConfig::default().policy(), None);

        let config: FileEscalationConfig = toml::from_str(
            r#"
enabled = true
rule = "unanimous"
min_successes = 3
"#,
        )
        .unwrap();
        let policy = config.policy().unwrap();
        assert_eq!(policy.rule, QuorumRule::Unanimous);
        assert_eq!(policy.min_successes, 3);
    }
}
