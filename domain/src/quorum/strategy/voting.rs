//! Exact-match voting.

use super::StrategyOutcome;
use super::canonical::{canonicalize, exact_groups, shares};
use crate::core::error::DomainError;
use serde_json::Value;

/// Majority by exact canonical match.
///
/// The largest group wins; ties go to the group seen first. The winner is
/// the group's first member.
///
/// # Example
///
/// ```
/// use quorum_domain::quorum::strategy::voting::vote;
/// use serde_json::json;
///
/// let outcome = vote(&[json!({"x": 1}), json!({"x": 1}), json!({"x": 2})]).unwrap();
/// assert_eq!(outcome.winning_payload, json!({"x": 1}));
/// assert!((outcome.agreement_ratio - 2.0 / 3.0).abs() < 1e-9);
/// ```
pub fn vote(payloads: &[Value]) -> Result<StrategyOutcome, DomainError> {
    if payloads.is_empty() {
        return Err(DomainError::EmptyBallot);
    }

    let canonicals: Vec<String> = payloads.iter().map(canonicalize).collect();
    let groups = exact_groups(&canonicals);
    let winner = largest(&groups);
    let total = payloads.len();
    let size = groups[winner].len();
    let index = groups[winner][0];

    Ok(StrategyOutcome {
        winner_index: index,
        winning_payload: payloads[index].clone(),
        agreement_ratio: size as f64 / total as f64,
        agreeing_count: size,
        explanation: format!(
            "voting: {}/{} responses agree ({:.1}%) across {} distinct answers",
            size,
            total,
            size as f64 * 100.0 / total as f64,
            groups.len()
        ),
        cluster_shares: shares(&groups, total),
        ranking: Vec::new(),
    })
}

/// Index of the largest group; earliest wins ties.
pub(crate) fn largest(groups: &[Vec<usize>]) -> usize {
    let mut best = 0;
    for (i, group) in groups.iter().enumerate().skip(1) {
        if group.len() > groups[best].len() {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identical_payloads_full_agreement() {
        for n in 2..6 {
            let payloads = vec![json!({"a": 1, "b": [true, null]}); n];
            let outcome = vote(&payloads).unwrap();
            assert_eq!(outcome.winning_payload, payloads[0]);
            assert_eq!(outcome.agreement_ratio, 1.0);
            assert_eq!(outcome.cluster_shares, vec![100.0]);
        }
    }

    #[test]
    fn test_key_order_counts_as_identical() {
        let payloads = vec![json!({"a": 1, "b": 2}), json!({"b": 2, "a": 1})];
        assert_eq!(vote(&payloads).unwrap().agreement_ratio, 1.0);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let payloads = vec![json!("b"), json!("a"), json!("a"), json!("b")];
        let outcome = vote(&payloads).unwrap();
        assert_eq!(outcome.winning_payload, json!("b"));
        assert_eq!(outcome.winner_index, 0);
        assert_eq!(outcome.agreement_ratio, 0.5);
    }

    #[test]
    fn test_empty_ballot() {
        assert_eq!(vote(&[]).unwrap_err(), DomainError::EmptyBallot);
    }
}
