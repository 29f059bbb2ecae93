//! Agreement rules
//!
//! A [`QuorumRule`] decides whether the winning group of a consensus is
//! large enough to be trusted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many responses must agree with the winner
///
/// - `Majority`: more than half (default)
/// - `Unanimous`: every response
/// - `AtLeast(n)`: at least n responses
/// - `Percentage(p)`: at least p% of responses
///
/// Written as `majority`, `unanimous`, `at-least:2` or `75%` in configuration.
///
/// # Example
///
/// ```
/// use quorum_domain::quorum::QuorumRule;
///
/// let rule: QuorumRule = "majority".parse().unwrap();
/// assert!(rule.is_satisfied(2, 3));
/// assert!(!rule.is_satisfied(1, 2));
///
/// let pct: QuorumRule = "75%".parse().unwrap();
/// assert!(pct.is_satisfied(3, 4));
/// assert!(!pct.is_satisfied(2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum QuorumRule {
    #[default]
    Majority,
    Unanimous,
    AtLeast(usize),
    Percentage(u8),
}

impl QuorumRule {
    /// Whether `agreeing` out of `total` responses satisfies the rule.
    pub fn is_satisfied(&self, agreeing: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        agreeing >= self.min_agreeing(total)
    }

    /// Smallest winning group that satisfies the rule for `total` responses.
    pub fn min_agreeing(&self, total: usize) -> usize {
        match self {
            QuorumRule::Majority => total / 2 + 1,
            QuorumRule::Unanimous => total,
            QuorumRule::AtLeast(n) => *n,
            QuorumRule::Percentage(p) => (total as f64 * (*p as f64 / 100.0)).ceil() as usize,
        }
    }
}

impl fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuorumRule::Majority => write!(f, "majority"),
            QuorumRule::Unanimous => write!(f, "unanimous"),
            QuorumRule::AtLeast(n) => write!(f, "at-least:{}", n),
            QuorumRule::Percentage(p) => write!(f, "{}%", p),
        }
    }
}

impl FromStr for QuorumRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Some(pct) = s.strip_suffix('%') {
            return match pct.trim().parse::<u8>() {
                Ok(p) if p <= 100 => Ok(QuorumRule::Percentage(p)),
                _ => Err(format!("invalid percentage rule '{}'", s)),
            };
        }
        if let Some(n) = s
            .strip_prefix("at-least:")
            .or_else(|| s.strip_prefix("at_least:"))
        {
            return n
                .trim()
                .parse::<usize>()
                .map(QuorumRule::AtLeast)
                .map_err(|_| format!("invalid at-least rule '{}'", s));
        }
        match s.as_str() {
            "majority" => Ok(QuorumRule::Majority),
            "unanimous" => Ok(QuorumRule::Unanimous),
            _ => Err(format!(
                "unknown quorum rule '{}' (expected majority, unanimous, at-least:N or P%)",
                s
            )),
        }
    }
}

impl TryFrom<String> for QuorumRule {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuorumRule> for String {
    fn from(rule: QuorumRule) -> Self {
        rule.to_string()
    }
}
