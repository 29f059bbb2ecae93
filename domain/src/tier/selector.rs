//! Cost tier selection

use super::complexity::{Complexity, estimate_complexity};
use crate::providers::ProfileCatalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Cost/quality bucket a request is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Cheap,
    Balanced,
    Expensive,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Cheap => "cheap",
            Tier::Balanced => "balanced",
            Tier::Expensive => "expensive",
        }
    }

    /// Built-in profile serving this tier
    pub fn default_profile(&self) -> &'static str {
        match self {
            Tier::Cheap => ProfileCatalog::ECONOMICAL,
            Tier::Balanced => ProfileCatalog::BALANCED,
            Tier::Expensive => ProfileCatalog::PREMIUM,
        }
    }
}

impl From<Complexity> for Tier {
    fn from(complexity: Complexity) -> Self {
        match complexity {
            Complexity::Simple => Tier::Cheap,
            Complexity::Medium => Tier::Balanced,
            Complexity::Complex | Complexity::Critical => Tier::Expensive,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cheap" => Ok(Tier::Cheap),
            "balanced" => Ok(Tier::Balanced),
            "expensive" => Ok(Tier::Expensive),
            other => Err(format!(
                "unknown tier '{}' (expected cheap, balanced or expensive)",
                other
            )),
        }
    }
}

/// Outcome of tier selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierDecision {
    pub tier: Tier,
    pub complexity: Complexity,
    pub profile_name: String,
    pub reason: String,
}

/// Maps complexity and task type to a tier and profile.
///
/// Task-type overrides win over complexity. When no complexity is given
/// it is estimated from the request text.
///
/// # Example
///
/// ```
/// use quorum_domain::tier::{Complexity, Tier, TierSelector};
///
/// let selector = TierSelector::default();
/// let d = selector.select(Some(Complexity::Simple), Some("security"), "");
/// assert_eq!(d.tier, Tier::Expensive);
/// assert_eq!(d.profile_name, "premium");
/// ```
#[derive(Debug, Clone)]
pub struct TierSelector {
    overrides: BTreeMap<String, Tier>,
    profiles: BTreeMap<Tier, String>,
}

impl Default for TierSelector {
    fn default() -> Self {
        let overrides = [
            ("security", Tier::Expensive),
            ("validation", Tier::Expensive),
            ("edge-cases", Tier::Expensive),
            ("compliance", Tier::Expensive),
            ("formatting", Tier::Cheap),
            ("logging", Tier::Cheap),
            ("documentation", Tier::Cheap),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let profiles = [Tier::Cheap, Tier::Balanced, Tier::Expensive]
            .into_iter()
            .map(|t| (t, t.default_profile().to_string()))
            .collect();

        Self {
            overrides,
            profiles,
        }
    }
}

impl TierSelector {
    /// Add or replace a task-type override.
    pub fn with_override(mut self, task_type: &str, tier: Tier) -> Self {
        self.overrides.insert(normalize_task_type(task_type), tier);
        self
    }

    /// Serve `tier` from a different profile.
    pub fn with_profile(mut self, tier: Tier, profile: impl Into<String>) -> Self {
        self.profiles.insert(tier, profile.into());
        self
    }

    pub fn override_for(&self, task_type: &str) -> Option<Tier> {
        self.overrides.get(&normalize_task_type(task_type)).copied()
    }

    pub fn profile_for(&self, tier: Tier) -> &str {
        self.profiles
            .get(&tier)
            .map(String::as_str)
            .unwrap_or_else(|| tier.default_profile())
    }

    pub fn select(
        &self,
        complexity: Option<Complexity>,
        task_type: Option<&str>,
        input: &str,
    ) -> TierDecision {
        let (complexity, complexity_reason) = match complexity {
            Some(c) => (c, format!("complexity {}", c)),
            None => {
                let estimate = estimate_complexity(input);
                (
                    estimate.complexity,
                    format!(
                        "estimated complexity {} (score {})",
                        estimate.complexity, estimate.score
                    ),
                )
            }
        };

        let overridden = task_type.and_then(|t| self.override_for(t).map(|tier| (t, tier)));
        let (tier, reason) = match overridden {
            Some((task, tier)) => (
                tier,
                format!("task type '{}' overrides {}", task, complexity_reason),
            ),
            None => (Tier::from(complexity), complexity_reason),
        };

        TierDecision {
            tier,
            complexity,
            profile_name: self.profile_for(tier).to_string(),
            reason,
        }
    }
}

fn normalize_task_type(task_type: &str) -> String {
    task_type
        .trim()
        .to_lowercase()
        .replace(['_', ' '], "-")
}
