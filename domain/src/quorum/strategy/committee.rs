//! Similarity-clustering committee.
//!
//! Every pair of canonical payloads is compared; pairs at or above the
//! similarity threshold are merged with union-find, and the largest
//! resulting cluster speaks for the committee. With `threshold == 1.0` only
//! identical payloads merge, which makes the outcome identical to
//! [`vote`](super::voting::vote).

use super::StrategyOutcome;
use super::canonical::{canonicalize, shares};
use super::similarity::is_similar;
use super::voting::largest;
use crate::core::error::DomainError;
use serde_json::Value;

pub const DEFAULT_THRESHOLD: f64 = 0.8;

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Union keeping the smaller index as root.
    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[merge] = keep;
        }
    }
}

/// Cluster canonical strings; clusters are ordered by their first member
/// and list members in ascending order.
pub fn clusters(canonicals: &[String], threshold: f64, max_chars: usize) -> Vec<Vec<usize>> {
    let n = canonicals.len();
    let mut set = DisjointSet::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if set.find(i) == set.find(j) {
                continue;
            }
            if is_similar(&canonicals[i], &canonicals[j], threshold, max_chars) {
                set.union(i, j);
            }
        }
    }

    let mut out: Vec<Vec<usize>> = Vec::new();
    let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        let root = set.find(i);
        match slot_of_root[root] {
            Some(slot) => out[slot].push(i),
            None => {
                slot_of_root[root] = Some(out.len());
                out.push(vec![i]);
            }
        }
    }
    out
}

/// Committee consensus over `payloads`.
///
/// # Example
///
/// ```
/// use quorum_domain::quorum::strategy::committee::cluster;
/// use serde_json::json;
///
/// let payloads = [
///     json!({"answer": "The capital is Paris"}),
///     json!({"answer": "The capital is Paris."}),
///     json!({"answer": "Lyon"}),
/// ];
/// let outcome = cluster(&payloads, 0.8, 4096).unwrap();
/// assert_eq!(outcome.winner_index, 0);
/// assert_eq!(outcome.cluster_shares.len(), 2);
/// ```
pub fn cluster(
    payloads: &[Value],
    threshold: f64,
    max_chars: usize,
) -> Result<StrategyOutcome, DomainError> {
    if payloads.is_empty() {
        return Err(DomainError::EmptyBallot);
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DomainError::InvalidThreshold(threshold));
    }

    let canonicals: Vec<String> = payloads.iter().map(canonicalize).collect();
    let groups = clusters(&canonicals, threshold, max_chars);
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
            "committee: {} cluster(s) at similarity >= {:.2}; largest holds {}/{} responses",
            groups.len(),
            threshold,
            size,
            total
        ),
        cluster_shares: shares(&groups, total),
        ranking: Vec::new(),
    })
}
