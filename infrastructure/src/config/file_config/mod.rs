//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod cache;
mod consensus;
mod output;
mod profiles;
mod providers;

pub use cache::FileCacheConfig;
pub use consensus::{FileConsensusConfig, FileEscalationConfig};
pub use output::{FileLoggingConfig, FileOutputConfig};
pub use profiles::{FileProviderEntry, FileTierConfig, build_catalog};
pub use providers::{FileAnthropicConfig, FileGeminiConfig, FileOpenAiConfig, FileProvidersConfig};

use quorum_application::{CacheParams, ConsensusParams};
use quorum_domain::{ProfileCatalog, StrategyKind, Tier, TierSelector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("unknown consensus strategy '{0}'")]
    UnknownStrategy(String),

    #[error("consensus.threshold must be within 0.0..=1.0, got {0}")]
    InvalidThreshold(f64),

    #[error("consensus.timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("consensus.temperature must be within 0.0..=2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("weight for '{name}' cannot be negative ({weight})")]
    NegativeWeight { name: String, weight: f64 },

    #[error("cache.ttl_secs cannot be 0")]
    InvalidTtl,

    #[error("providers.retry.max_attempts cannot be 0")]
    InvalidRetry,

    #[error("profile '{0}' has no providers")]
    EmptyProfile(String),

    #[error("profile '{0}' has an empty model name")]
    EmptyModelName(String),

    #[error("tier {tier} points at unknown profile '{profile}'")]
    UnknownTierProfile { tier: Tier, profile: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Strategy and request settings
    pub consensus: FileConsensusConfig,
    /// Cheap-to-expensive escalation
    pub escalation: FileEscalationConfig,
    /// Consensus cache settings
    pub cache: FileCacheConfig,
    /// Backend credentials, endpoints and retry policy
    pub providers: FileProvidersConfig,
    /// Additional named profiles
    pub profiles: BTreeMap<String, Vec<FileProviderEntry>>,
    /// Tier to profile mapping and task-type overrides
    pub tier: FileTierConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Usage log and log file locations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.consensus.validate()?;

        if self.cache.ttl_secs == 0 {
            return Err(ConfigValidationError::InvalidTtl);
        }
        if self.providers.retry.max_attempts == 0 {
            return Err(ConfigValidationError::InvalidRetry);
        }

        profiles::validate_profiles(&self.profiles)?;
        self.tier.validate(&self.catalog())?;

        Ok(())
    }

    /// Built-in profiles merged with `[profiles]`
    pub fn catalog(&self) -> ProfileCatalog {
        build_catalog(&self.profiles)
    }

    pub fn selector(&self) -> TierSelector {
        self.tier.to_selector()
    }

    pub fn cache_params(&self) -> CacheParams {
        self.cache.to_params()
    }

    /// Request and reconciliation parameters, with an optional strategy override
    pub fn consensus_params(
        &self,
        strategy: Option<StrategyKind>,
    ) -> Result<ConsensusParams, ConfigValidationError> {
        let mut params = ConsensusParams::default()
            .with_strategy(self.consensus.to_strategy(strategy)?)
            .with_temperature(self.consensus.temperature)
            .with_timeout(Duration::from_secs(self.consensus.timeout_secs))
            .with_output_schema(self.consensus.output_schema.clone())
            .with_escalation(self.escalation.policy());
        if let Some(prompt) = &self.consensus.system_prompt {
            params = params.with_system_prompt(prompt.clone());
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_domain::{ConsensusStrategy, FieldType, OutputFormat, QuorumRule};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[consensus]
strategy = "committee"
threshold = 0.7
timeout_secs = 30
system_prompt = "Answer as a panel member."

[[consensus.output_schema.fields]]
name = "verdict"
type = "string"

[[consensus.output_schema.fields]]
name = "score"
type = "number"
required = false

[escalation]
enabled = true
rule = "at-least:2"

[cache]
ttl_secs = 600

[providers.anthropic]
api_key_env = "MY_ANTHROPIC_KEY"

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());

        let params = config.consensus_params(None).unwrap();
        assert_eq!(
            params.strategy,
            ConsensusStrategy::Committee {
                threshold: 0.7,
                max_compare_chars: 4096,
            }
        );
        assert_eq!(params.timeout, Duration::from_secs(30));
        assert_eq!(params.system_prompt, "Answer as a panel member.");
        let schema = params.output_schema.unwrap();
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.fields[1].field_type, FieldType::Number);
        assert!(!schema.fields[1].required);
        assert_eq!(params.escalation.unwrap().rule, QuorumRule::AtLeast(2));

        assert_eq!(config.cache_params().ttl, Duration::from_secs(600));
        assert_eq!(config.providers.anthropic.api_key_env, "MY_ANTHROPIC_KEY");
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.profiles.is_empty());
        assert!(config.output.color);
        assert!(config.output.show_progress);

        let params = config.consensus_params(None).unwrap();
        assert_eq!(params.strategy, ConsensusStrategy::Voting);
        assert!(params.escalation.is_none());
        assert_eq!(params.system_prompt, quorum_application::config::DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_strategy_override() {
        let config = FileConfig::default();
        let params = config
            .consensus_params(Some(StrategyKind::Ranking))
            .unwrap();
        assert_eq!(params.strategy.kind(), StrategyKind::Ranking);
    }

    #[test]
    fn test_validate_rejects_bad_sections() {
        let mut config = FileConfig::default();
        config.cache.ttl_secs = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTtl));

        let mut config = FileConfig::default();
        config.providers.retry.max_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidRetry));

        let mut config = FileConfig::default();
        config.tier.cheap = Some("missing".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownTierProfile { .. })
        ));
    }

    #[test]
    fn test_serialize_round_trips_through_toml() {
        let config = FileConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: FileConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
