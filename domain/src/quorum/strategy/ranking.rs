//! Multi-criterion ranking.

use super::canonical::{canonicalize, exact_groups};
use super::{RankEntry, StrategyOutcome};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const UNCLEAR_MARKERS: [&str; 4] = ["error", "unknown", "undefined", "n/a"];
const MARKER_SATURATION: usize = 4;
const NUMERIC_SATURATION: usize = 5;

/// Relative weight of each ranking criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub completeness: f64,
    pub clarity: f64,
    pub specificity: f64,
    pub uniqueness: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            completeness: 0.3,
            clarity: 0.3,
            specificity: 0.2,
            uniqueness: 0.2,
        }
    }
}

/// Score every payload and return the best one plus the full ranking.
///
/// - completeness: serialized length relative to the longest payload
/// - clarity: absence of error/unknown markers
/// - specificity: number of numeric tokens, saturating at 5
/// - uniqueness: inverse of the exact-duplicate count
///
/// Ties keep input order.
pub fn rank(payloads: &[Value], weights: &RankingWeights) -> Result<StrategyOutcome, DomainError> {
    if payloads.is_empty() {
        return Err(DomainError::EmptyBallot);
    }

    let canonicals: Vec<String> = payloads.iter().map(canonicalize).collect();
    let groups = exact_groups(&canonicals);
    let mut group_size = vec![0usize; payloads.len()];
    for group in &groups {
        for &i in group {
            group_size[i] = group.len();
        }
    }
    let longest = canonicals
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut ranking: Vec<RankEntry> = canonicals
        .iter()
        .enumerate()
        .map(|(index, canonical)| {
            let completeness = canonical.chars().count() as f64 / longest as f64;
            let clarity = clarity(canonical);
            let specificity = specificity(canonical);
            let uniqueness = 1.0 / group_size[index] as f64;
            let score = weights.completeness * completeness
                + weights.clarity * clarity
                + weights.specificity * specificity
                + weights.uniqueness * uniqueness;
            RankEntry { index, score }
        })
        .collect();
    ranking.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));

    let top = ranking[0];
    let total = payloads.len();
    Ok(StrategyOutcome {
        winner_index: top.index,
        winning_payload: payloads[top.index].clone(),
        agreement_ratio: group_size[top.index] as f64 / total as f64,
        agreeing_count: group_size[top.index],
        explanation: format!(
            "ranking: top score {:.3} among {} responses (runner-up {:.3})",
            top.score,
            total,
            ranking.get(1).map(|r| r.score).unwrap_or(0.0)
        ),
        cluster_shares: super::canonical::shares(&groups, total),
        ranking,
    })
}

fn clarity(canonical: &str) -> f64 {
    let lower = canonical.to_lowercase();
    let hits: usize = UNCLEAR_MARKERS
        .iter()
        .map(|marker| lower.matches(marker).count())
        .sum();
    1.0 - hits.min(MARKER_SATURATION) as f64 / MARKER_SATURATION as f64
}

fn specificity(canonical: &str) -> f64 {
    numeric_tokens(canonical).min(NUMERIC_SATURATION) as f64 / NUMERIC_SATURATION as f64
}

/// Count maximal runs of ASCII digits.
fn numeric_tokens(text: &str) -> usize {
    let mut count = 0;
    let mut in_number = false;
    for c in text.chars() {
        if c.is_ascii_digit() {
            if !in_number {
                count += 1;
                in_number = true;
            }
        } else {
            in_number = false;
        }
    }
    count
}
