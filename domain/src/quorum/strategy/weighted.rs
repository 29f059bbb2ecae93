//! Weighted and confidence-weighted voting.

use super::StrategyOutcome;
use super::canonical::{canonicalize, exact_groups, shares};
use crate::core::error::DomainError;
use serde_json::Value;

/// Exact-match grouping where each response contributes its weight.
///
/// Negative weights count as zero. When every weight is zero the result
/// falls back to plain head-count voting.
pub fn weighted_vote(
    payloads: &[Value],
    weights: &[f64],
) -> Result<StrategyOutcome, DomainError> {
    reconcile(payloads, weights, "weighted voting")
}

/// Like [`weighted_vote`], with per-response confidence scores in `0.0..=1.0`.
pub fn hybrid_vote(
    payloads: &[Value],
    confidences: &[f64],
) -> Result<StrategyOutcome, DomainError> {
    let clamped: Vec<f64> = confidences.iter().map(|c| c.clamp(0.0, 1.0)).collect();
    reconcile(payloads, &clamped, "hybrid confidence voting")
}

fn reconcile(
    payloads: &[Value],
    weights: &[f64],
    label: &str,
) -> Result<StrategyOutcome, DomainError> {
    if payloads.is_empty() {
        return Err(DomainError::EmptyBallot);
    }
    if payloads.len() != weights.len() {
        return Err(DomainError::WeightMismatch {
            payloads: payloads.len(),
            weights: weights.len(),
        });
    }

    let canonicals: Vec<String> = payloads.iter().map(canonicalize).collect();
    let groups = exact_groups(&canonicals);
    let weight_of = |i: usize| weights[i].max(0.0);
    let total_weight: f64 = (0..payloads.len()).map(weight_of).sum();

    if total_weight <= 0.0 {
        let mut outcome = super::voting::vote(payloads)?;
        outcome.explanation = format!(
            "{} (all weights zero, counted heads): {}",
            label, outcome.explanation
        );
        return Ok(outcome);
    }

    let group_weights: Vec<f64> = groups
        .iter()
        .map(|g| g.iter().map(|&i| weight_of(i)).sum())
        .collect();

    let mut best = 0;
    for (i, w) in group_weights.iter().enumerate().skip(1) {
        if *w > group_weights[best] {
            best = i;
        }
    }

    let index = groups[best][0];
    let ratio = group_weights[best] / total_weight;

    Ok(StrategyOutcome {
        winner_index: index,
        winning_payload: payloads[index].clone(),
        agreement_ratio: ratio,
        agreeing_count: groups[best].len(),
        explanation: format!(
            "{}: winning answer carries {:.2} of {:.2} total weight ({:.1}%) from {}/{} responses",
            label,
            group_weights[best],
            total_weight,
            ratio * 100.0,
            groups[best].len(),
            payloads.len()
        ),
        cluster_shares: shares(&groups, payloads.len()),
        ranking: Vec::new(),
    })
}
