//! Profile configuration from TOML (`[profiles]` and `[tier]` sections)
//!
//! ```toml
//! [[profiles.local]]
//! provider = "openai"
//! model = "gpt-4.1-mini"
//! cost = "low"
//!
//! [tier]
//! cheap = "local"
//!
//! [tier.overrides]
//! "threat-model" = "expensive"
//! ```

use super::ConfigValidationError;
use quorum_domain::{
    CostClass, LatencyClass, Profile, ProfileCatalog, ProviderDescriptor, ProviderFamily, Tier,
    TierSelector,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One provider/model pair of a configured profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProviderEntry {
    pub provider: ProviderFamily,
    pub model: String,
    #[serde(default)]
    pub cost: CostClass,
    #[serde(default)]
    pub latency: LatencyClass,
}

impl FileProviderEntry {
    pub fn to_descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(self.provider, self.model.trim())
            .with_cost(self.cost)
            .with_latency(self.latency)
    }
}

/// Raw `[tier]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTierConfig {
    /// Profile serving the cheap tier (default: economical)
    pub cheap: Option<String>,
    /// Profile serving the balanced tier (default: balanced)
    pub balanced: Option<String>,
    /// Profile serving the expensive tier (default: premium)
    pub expensive: Option<String>,
    /// Extra task-type overrides, merged over the built-in table
    pub overrides: BTreeMap<String, Tier>,
}

impl FileTierConfig {
    pub fn to_selector(&self) -> TierSelector {
        let mut selector = TierSelector::default();
        for (tier, profile) in self.profiles() {
            selector = selector.with_profile(tier, profile);
        }
        for (task_type, tier) in &self.overrides {
            selector = selector.with_override(task_type, *tier);
        }
        selector
    }

    fn profiles(&self) -> impl Iterator<Item = (Tier, &str)> {
        [
            (Tier::Cheap, &self.cheap),
            (Tier::Balanced, &self.balanced),
            (Tier::Expensive, &self.expensive),
        ]
        .into_iter()
        .filter_map(|(tier, name)| name.as_deref().map(|n| (tier, n)))
    }

    pub(super) fn validate(&self, catalog: &ProfileCatalog) -> Result<(), ConfigValidationError> {
        for (tier, profile) in self.profiles() {
            if catalog.get(profile).is_none() {
                return Err(ConfigValidationError::UnknownTierProfile {
                    tier,
                    profile: profile.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Built-in profiles plus the configured ones (configured names replace built-ins).
pub fn build_catalog(profiles: &BTreeMap<String, Vec<FileProviderEntry>>) -> ProfileCatalog {
    let mut catalog = ProfileCatalog::builtin();
    for (name, entries) in profiles {
        let providers = entries.iter().map(FileProviderEntry::to_descriptor).collect();
        catalog.insert(Profile::new(name.clone(), providers));
    }
    catalog
}

pub(super) fn validate_profiles(
    profiles: &BTreeMap<String, Vec<FileProviderEntry>>,
) -> Result<(), ConfigValidationError> {
    for (name, entries) in profiles {
        if entries.is_empty() {
            return Err(ConfigValidationError::EmptyProfile(name.clone()));
        }
        if entries.iter().any(|e| e.model.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyModelName(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        profiles: BTreeMap<String, Vec<FileProviderEntry>>,
        #[serde(default)]
        tier: FileTierConfig,
    }

    #[test]
    fn test_custom_profile_added_to_catalog() {
        let w: Wrapper = toml::from_str(
            r#"
[[profiles.local]]
provider = "openai"
model = "gpt-4.1-mini"
cost = "low"

[[profiles.local]]
provider = "gemini"
model = "gemini-2.5-flash"
latency = "fast"
"#,
        )
        .unwrap();

        let catalog = build_catalog(&w.profiles);
        let local = catalog.get("local").unwrap();
        assert_eq!(local.len(), 2);
        assert_eq!(local.providers()[0].family, ProviderFamily::OpenAi);
        assert_eq!(local.providers()[0].cost_class, CostClass::Low);
        assert_eq!(local.providers()[1].latency_class, LatencyClass::Fast);
        assert_eq!(local.providers()[1].cost_class, CostClass::Medium);
        // built-ins survive
        assert!(catalog.get(ProfileCatalog::PREMIUM).is_some());
    }

    #[test]
    fn test_tier_config_builds_selector() {
        let w: Wrapper = toml::from_str(
            r#"
[[profiles.local]]
provider = "openai"
model = "gpt-4.1-mini"

[tier]
cheap = "local"

[tier.overrides]
threat_model = "expensive"
"#,
        )
        .unwrap();

        let selector = w.tier.to_selector();
        assert_eq!(selector.profile_for(Tier::Cheap), "local");
        assert_eq!(selector.profile_for(Tier::Expensive), "premium");
        assert_eq!(selector.override_for("threat-model"), Some(Tier::Expensive));
        assert_eq!(selector.override_for("security"), Some(Tier::Expensive));

        let catalog = build_catalog(&w.profiles);
        assert!(w.tier.validate(&catalog).is_ok());
    }

    #[test]
    fn test_tier_pointing_at_missing_profile() {
        let tier = FileTierConfig {
            expensive: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            tier.validate(&ProfileCatalog::builtin()),
            Err(ConfigValidationError::UnknownTierProfile {
                tier: Tier::Expensive,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_profile_rejected() {
        let mut profiles = BTreeMap::new();
        profiles.insert("hollow".to_string(), Vec::new());
        assert!(matches!(
            validate_profiles(&profiles),
            Err(ConfigValidationError::EmptyProfile(name)) if name == "hollow"
        ));
    }
}
