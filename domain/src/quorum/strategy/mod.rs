//! Consensus strategies
//!
//! Every strategy is a pure function over the surviving payloads and returns
//! a [`StrategyOutcome`]. [`ConsensusStrategy`] bundles a strategy with its
//! configuration so callers can pick one at runtime.
//!
//! | Strategy | Groups by | Winner |
//! |----------|-----------|--------|
//! | Voting | exact canonical match | largest group |
//! | Weighted voting | exact canonical match | highest summed provider weight |
//! | Hybrid | exact canonical match | highest summed confidence |
//! | Committee | edit-distance similarity | largest cluster |
//! | Ranking | - | highest multi-criterion score |
//! | Augmented | exact match + clusters | largest group |

pub mod augmented;
pub mod canonical;
pub mod committee;
pub mod ranking;
pub mod similarity;
pub mod voting;
pub mod weighted;

use crate::core::error::DomainError;
use ranking::RankingWeights;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use similarity::DEFAULT_MAX_COMPARE_CHARS;

/// Payload field read as a self-reported confidence by the hybrid strategy
pub const DEFAULT_CONFIDENCE_FIELD: &str = "confidence";

/// Confidence assumed when a payload does not report one
pub const MISSING_CONFIDENCE: f64 = 0.5;

/// Score of one response under the ranking strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub index: usize,
    pub score: f64,
}

/// What a strategy decided
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    /// Index into the input payloads
    pub winner_index: usize,
    pub winning_payload: Value,
    /// Fraction in `0.0..=1.0`; a share of weight for weighted strategies
    pub agreement_ratio: f64,
    /// Responses in the winning group, whatever the weighting
    pub agreeing_count: usize,
    pub explanation: String,
    /// Group or cluster sizes as percentages, largest first
    pub cluster_shares: Vec<f64>,
    /// Only filled by the ranking strategy
    pub ranking: Vec<RankEntry>,
}

/// Name of a strategy, as used in configuration and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    Voting,
    WeightedVoting,
    Hybrid,
    Committee,
    Ranking,
    Augmented,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Voting => "voting",
            StrategyKind::WeightedVoting => "weighted-voting",
            StrategyKind::Hybrid => "hybrid",
            StrategyKind::Committee => "committee",
            StrategyKind::Ranking => "ranking",
            StrategyKind::Augmented => "augmented",
        }
    }

    pub fn all() -> &'static [StrategyKind] {
        &[
            StrategyKind::Voting,
            StrategyKind::WeightedVoting,
            StrategyKind::Hybrid,
            StrategyKind::Committee,
            StrategyKind::Ranking,
            StrategyKind::Augmented,
        ]
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "voting" | "vote" | "majority" => Ok(StrategyKind::Voting),
            "weighted-voting" | "weighted" => Ok(StrategyKind::WeightedVoting),
            "hybrid" | "confidence" => Ok(StrategyKind::Hybrid),
            "committee" | "cluster" => Ok(StrategyKind::Committee),
            "ranking" | "rank" => Ok(StrategyKind::Ranking),
            "augmented" => Ok(StrategyKind::Augmented),
            other => Err(format!(
                "unknown strategy '{}' (expected one of: {})",
                other,
                StrategyKind::all()
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// One surviving response handed to a strategy
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    /// Provider family, e.g. `anthropic`
    pub provider_id: String,
    /// `provider/model`
    pub source: String,
    pub payload: Value,
}

/// A strategy together with its settings
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConsensusStrategy {
    #[default]
    Voting,
    WeightedVoting {
        /// Keyed by `provider/model` or by provider family
        weights: BTreeMap<String, f64>,
        default_weight: f64,
    },
    Hybrid {
        confidence_field: String,
    },
    Committee {
        threshold: f64,
        max_compare_chars: usize,
    },
    Ranking {
        weights: RankingWeights,
    },
    Augmented {
        threshold: f64,
        max_compare_chars: usize,
    },
}

impl ConsensusStrategy {
    /// Strategy of the given kind with default settings.
    pub fn from_kind(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Voting => ConsensusStrategy::Voting,
            StrategyKind::WeightedVoting => ConsensusStrategy::WeightedVoting {
                weights: BTreeMap::new(),
                default_weight: 1.0,
            },
            StrategyKind::Hybrid => ConsensusStrategy::Hybrid {
                confidence_field: DEFAULT_CONFIDENCE_FIELD.to_string(),
            },
            StrategyKind::Committee => ConsensusStrategy::Committee {
                threshold: committee::DEFAULT_THRESHOLD,
                max_compare_chars: DEFAULT_MAX_COMPARE_CHARS,
            },
            StrategyKind::Ranking => ConsensusStrategy::Ranking {
                weights: RankingWeights::default(),
            },
            StrategyKind::Augmented => ConsensusStrategy::Augmented {
                threshold: committee::DEFAULT_THRESHOLD,
                max_compare_chars: DEFAULT_MAX_COMPARE_CHARS,
            },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            ConsensusStrategy::Voting => StrategyKind::Voting,
            ConsensusStrategy::WeightedVoting { .. } => StrategyKind::WeightedVoting,
            ConsensusStrategy::Hybrid { .. } => StrategyKind::Hybrid,
            ConsensusStrategy::Committee { .. } => StrategyKind::Committee,
            ConsensusStrategy::Ranking { .. } => StrategyKind::Ranking,
            ConsensusStrategy::Augmented { .. } => StrategyKind::Augmented,
        }
    }

    /// Reconcile the ballots into one outcome.
    ///
    /// The returned `winning_payload` is always the ballot's original payload.
    pub fn apply(&self, ballots: &[Ballot]) -> Result<StrategyOutcome, DomainError> {
        let payloads: Vec<Value> = ballots.iter().map(|b| b.payload.clone()).collect();

        match self {
            ConsensusStrategy::Voting => voting::vote(&payloads),
            ConsensusStrategy::WeightedVoting {
                weights,
                default_weight,
            } => {
                let per_ballot: Vec<f64> = ballots
                    .iter()
                    .map(|b| {
                        weights
                            .get(&b.source)
                            .or_else(|| weights.get(&b.provider_id))
                            .copied()
                            .unwrap_or(*default_weight)
                    })
                    .collect();
                weighted::weighted_vote(&payloads, &per_ballot)
            }
            ConsensusStrategy::Hybrid { confidence_field } => {
                let (stripped, confidences): (Vec<Value>, Vec<f64>) = payloads
                    .iter()
                    .map(|p| split_confidence(p, confidence_field))
                    .unzip();
                let mut outcome = weighted::hybrid_vote(&stripped, &confidences)?;
                outcome.winning_payload = payloads[outcome.winner_index].clone();
                Ok(outcome)
            }
            ConsensusStrategy::Committee {
                threshold,
                max_compare_chars,
            } => committee::cluster(&payloads, *threshold, *max_compare_chars),
            ConsensusStrategy::Ranking { weights } => ranking::rank(&payloads, weights),
            ConsensusStrategy::Augmented {
                threshold,
                max_compare_chars,
            } => augmented::augment(&payloads, *threshold, *max_compare_chars),
        }
    }
}

/// Separate a self-reported confidence from the payload.
///
/// Non-numeric or missing confidences become [`MISSING_CONFIDENCE`].
pub fn split_confidence(payload: &Value, field: &str) -> (Value, f64) {
    match payload {
        Value::Object(map) if map.contains_key(field) => {
            let mut stripped = map.clone();
            let confidence = stripped
                .remove(field)
                .and_then(|v| v.as_f64())
                .unwrap_or(MISSING_CONFIDENCE)
                .clamp(0.0, 1.0);
            (Value::Object(stripped), confidence)
        }
        other => (other.clone(), MISSING_CONFIDENCE),
    }
}
