//! Voting augmented with a committee explanation.

use super::StrategyOutcome;
use super::canonical::canonicalize;
use super::committee::clusters;
use super::voting::{largest, vote};
use crate::core::error::DomainError;
use serde_json::Value;

/// Run voting for the winner and clustering for the explanation.
///
/// # Example
///
/// ```
/// use quorum_domain::quorum::strategy::augmented::augment;
/// use serde_json::json;
///
/// let outcome = augment(&[json!({"x": 1}), json!({"x": 1}), json!({"x": 2})], 1.0, 4096).unwrap();
/// assert_eq!(
///     outcome.explanation,
///     "consensus reached via voting (66.7% agreement) across 2 distinct viewpoints; largest agreement group 2/3"
/// );
/// ```
pub fn augment(
    payloads: &[Value],
    threshold: f64,
    max_chars: usize,
) -> Result<StrategyOutcome, DomainError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DomainError::InvalidThreshold(threshold));
    }
    let mut outcome = vote(payloads)?;

    let canonicals: Vec<String> = payloads.iter().map(canonicalize).collect();
    let groups = clusters(&canonicals, threshold, max_chars);
    let largest_cluster = groups[largest(&groups)].len();

    outcome.explanation = format!(
        "consensus reached via voting ({:.1}% agreement) across {} distinct viewpoints; largest agreement group {}/{}",
        outcome.agreement_ratio * 100.0,
        groups.len(),
        largest_cluster,
        payloads.len()
    );
    outcome.cluster_shares = super::canonical::shares(&groups, payloads.len());
    Ok(outcome)
}
