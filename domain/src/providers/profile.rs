//! Named provider profiles

use super::descriptor::{CostClass, LatencyClass, ProviderDescriptor, ProviderFamily};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, ordered, read-only list of providers consulted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    name: String,
    providers: Vec<ProviderDescriptor>,
}

impl Profile {
    pub fn new(name: impl Into<String>, providers: Vec<ProviderDescriptor>) -> Self {
        Self {
            name: name.into(),
            providers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// How a caller designates the providers for a request: by profile name or
/// by an explicit descriptor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRef {
    Named(String),
    Explicit(Vec<ProviderDescriptor>),
}

impl From<&str> for ProfileRef {
    fn from(name: &str) -> Self {
        ProfileRef::Named(name.to_string())
    }
}

impl From<String> for ProfileRef {
    fn from(name: String) -> Self {
        ProfileRef::Named(name)
    }
}

impl From<Vec<ProviderDescriptor>> for ProfileRef {
    fn from(providers: Vec<ProviderDescriptor>) -> Self {
        ProfileRef::Explicit(providers)
    }
}

/// Static lookup table from profile name to [`Profile`].
///
/// [`ProfileCatalog::builtin`] holds `balanced`, `premium`, `economical`,
/// `fast`, `accurate` and the single-provider `fallback`. Configuration may
/// add or replace entries with [`ProfileCatalog::insert`].
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileCatalog {
    pub const BALANCED: &'static str = "balanced";
    pub const PREMIUM: &'static str = "premium";
    pub const ECONOMICAL: &'static str = "economical";
    pub const FAST: &'static str = "fast";
    pub const ACCURATE: &'static str = "accurate";
    pub const FALLBACK: &'static str = "fallback";

    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        use CostClass::*;
        use LatencyClass::*;
        use ProviderFamily::*;

        let d = |family, model: &str, cost, latency| {
            ProviderDescriptor::new(family, model)
                .with_cost(cost)
                .with_latency(latency)
        };

        let mut catalog = Self::empty();
        catalog.insert(Profile::new(
            Self::BALANCED,
            vec![
                d(Anthropic, "claude-sonnet-4-5", Medium, Standard),
                d(OpenAi, "gpt-4.1", Medium, Standard),
                d(Gemini, "gemini-2.5-flash", Low, Fast),
            ],
        ));
        catalog.insert(Profile::new(
            Self::PREMIUM,
            vec![
                d(Anthropic, "claude-opus-4-1", High, Slow),
                d(OpenAi, "gpt-5", High, Slow),
                d(Gemini, "gemini-2.5-pro", High, Standard),
            ],
        ));
        catalog.insert(Profile::new(
            Self::ECONOMICAL,
            vec![
                d(Anthropic, "claude-haiku-4-5", Low, Fast),
                d(OpenAi, "gpt-5-mini", Low, Fast),
                d(Gemini, "gemini-2.5-flash", Low, Fast),
            ],
        ));
        catalog.insert(Profile::new(
            Self::FAST,
            vec![
                d(Gemini, "gemini-2.5-flash", Low, Fast),
                d(Anthropic, "claude-haiku-4-5", Low, Fast),
            ],
        ));
        catalog.insert(Profile::new(
            Self::ACCURATE,
            vec![
                d(Anthropic, "claude-opus-4-1", High, Slow),
                d(Anthropic, "claude-sonnet-4-5", Medium, Standard),
                d(OpenAi, "gpt-5", High, Slow),
                d(Gemini, "gemini-2.5-pro", High, Standard),
            ],
        ));
        catalog.insert(Profile::new(
            Self::FALLBACK,
            vec![d(Anthropic, "claude-sonnet-4-5", Medium, Standard)],
        ));
        catalog
    }

    /// Add or replace a profile.
    pub fn insert(&mut self, profile: Profile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Resolve a [`ProfileRef`] to a concrete profile.
    ///
    /// Explicit descriptor lists become an ad-hoc profile named `custom`.
    pub fn resolve(&self, profile: &ProfileRef) -> Result<Profile, DomainError> {
        match profile {
            ProfileRef::Named(name) => self
                .get(name)
                .cloned()
                .ok_or_else(|| DomainError::UnknownProfile(name.clone())),
            ProfileRef::Explicit(providers) => Ok(Profile::new("custom", providers.clone())),
        }
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_present() {
        let catalog = ProfileCatalog::builtin();
        for name in [
            "balanced",
            "premium",
            "economical",
            "fast",
            "accurate",
            "fallback",
        ] {
            let profile = catalog.get(name).unwrap();
            assert!(!profile.is_empty(), "{} should not be empty", name);
        }
        assert_eq!(catalog.get("fallback").unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_unknown_profile() {
        let catalog = ProfileCatalog::builtin();
        let err = catalog.resolve(&"turbo".into()).unwrap_err();
        assert_eq!(err, DomainError::UnknownProfile("turbo".to_string()));
    }

    #[test]
    fn test_resolve_explicit_profile() {
        let catalog = ProfileCatalog::empty();
        let providers = vec![ProviderDescriptor::new(ProviderFamily::OpenAi, "gpt-4.1")];
        let profile = catalog.resolve(&providers.clone().into()).unwrap();
        assert_eq!(profile.name(), "custom");
        assert_eq!(profile.providers(), providers.as_slice());
    }

    #[test]
    fn test_insert_replaces_profile() {
        let mut catalog = ProfileCatalog::builtin();
        catalog.insert(Profile::new(
            "fast",
            vec![ProviderDescriptor::new(ProviderFamily::Gemini, "gemini-2.5-flash")],
        ));
        assert_eq!(catalog.get("fast").unwrap().len(), 1);
    }

    #[test]
    fn test_premium_is_expensive() {
        let catalog = ProfileCatalog::builtin();
        assert!(
            catalog
                .get("premium")
                .unwrap()
                .providers()
                .iter()
                .all(|d| d.cost_class == CostClass::High)
        );
    }
}
