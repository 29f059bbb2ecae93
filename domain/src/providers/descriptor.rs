//! Provider descriptor value objects

use serde::{Deserialize, Serialize};

/// Backend family a descriptor is served by.
///
/// Each family has exactly one adapter registered at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    Anthropic,
    OpenAi,
    Gemini,
}

impl ProviderFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFamily::Anthropic => "anthropic",
            ProviderFamily::OpenAi => "openai",
            ProviderFamily::Gemini => "gemini",
        }
    }

    pub fn all() -> [ProviderFamily; 3] {
        [
            ProviderFamily::Anthropic,
            ProviderFamily::OpenAi,
            ProviderFamily::Gemini,
        ]
    }
}

impl std::fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderFamily::Anthropic),
            "openai" | "gpt" => Ok(ProviderFamily::OpenAi),
            "gemini" | "google" => Ok(ProviderFamily::Gemini),
            other => Err(format!(
                "Unknown provider: {}. Valid: anthropic, openai, gemini",
                other
            )),
        }
    }
}

/// Relative price bucket of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostClass {
    Low,
    #[default]
    Medium,
    High,
}

impl CostClass {
    /// Relative cost units per 1000 characters exchanged.
    pub fn rate_per_kchar(&self) -> f64 {
        match self {
            CostClass::Low => 1.0,
            CostClass::Medium => 4.0,
            CostClass::High => 15.0,
        }
    }
}

/// Expected response latency bucket of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyClass {
    Fast,
    #[default]
    Standard,
    Slow,
}

/// Immutable description of one backend/model pair.
///
/// # Example
///
/// ```
/// use quorum_domain::providers::{CostClass, LatencyClass, ProviderDescriptor, ProviderFamily};
///
/// let d = ProviderDescriptor::new(ProviderFamily::Anthropic, "claude-haiku-4-5")
///     .with_cost(CostClass::Low)
///     .with_latency(LatencyClass::Fast);
/// assert_eq!(d.provider_id(), "anthropic");
/// assert_eq!(d.to_string(), "anthropic/claude-haiku-4-5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    #[serde(rename = "provider")]
    pub family: ProviderFamily,
    #[serde(rename = "model")]
    pub model_id: String,
    #[serde(default, rename = "cost")]
    pub cost_class: CostClass,
    #[serde(default, rename = "latency")]
    pub latency_class: LatencyClass,
}

impl ProviderDescriptor {
    pub fn new(family: ProviderFamily, model_id: impl Into<String>) -> Self {
        Self {
            family,
            model_id: model_id.into(),
            cost_class: CostClass::default(),
            latency_class: LatencyClass::default(),
        }
    }

    pub fn with_cost(mut self, cost_class: CostClass) -> Self {
        self.cost_class = cost_class;
        self
    }

    pub fn with_latency(mut self, latency_class: LatencyClass) -> Self {
        self.latency_class = latency_class;
        self
    }

    pub fn provider_id(&self) -> &'static str {
        self.family.as_str()
    }
}

impl std::fmt::Display for ProviderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.family, self.model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_parse() {
        assert_eq!(
            "Anthropic".parse::<ProviderFamily>().ok(),
            Some(ProviderFamily::Anthropic)
        );
        assert_eq!(
            "gpt".parse::<ProviderFamily>().ok(),
            Some(ProviderFamily::OpenAi)
        );
        assert!("mistral".parse::<ProviderFamily>().is_err());
    }

    #[test]
    fn test_descriptor_deserialize_defaults() {
        let d: ProviderDescriptor =
            serde_json::from_str(r#"{"provider":"gemini","model":"gemini-2.5-pro"}"#).unwrap();
        assert_eq!(d.family, ProviderFamily::Gemini);
        assert_eq!(d.cost_class, CostClass::Medium);
        assert_eq!(d.latency_class, LatencyClass::Standard);
    }

    #[test]
    fn test_cost_rates_are_ordered() {
        assert!(CostClass::Low.rate_per_kchar() < CostClass::Medium.rate_per_kchar());
        assert!(CostClass::Medium.rate_per_kchar() < CostClass::High.rate_per_kchar());
    }
}
