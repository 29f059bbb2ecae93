//! Provider configuration from TOML (`[providers]` section)

use crate::providers::retry::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Anthropic Messages API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Max tokens per response.
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            api_version: "2023-06-01".to_string(),
        }
    }
}

/// OpenAI Chat Completions configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// Base URL (can point at any OpenAI-compatible endpoint).
    pub base_url: String,
    /// Max tokens per response.
    pub max_tokens: u32,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 4096,
        }
    }
}

/// Gemini `generateContent` configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_tokens: u32,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 4096,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub anthropic: FileAnthropicConfig,
    pub openai: FileOpenAiConfig,
    pub gemini: FileGeminiConfig,
    /// Retry policy shared by all adapters.
    pub retry: RetryPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileProvidersConfig::default();
        assert_eq!(config.anthropic.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.step_ms, 500);
    }

    #[test]
    fn test_partial_override() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[openai]
base_url = "http://localhost:11434"
api_key_env = "LOCAL_KEY"

[retry]
max_attempts = 5
"#,
        )
        .unwrap();
        assert_eq!(config.openai.base_url, "http://localhost:11434");
        assert_eq!(config.openai.api_key_env, "LOCAL_KEY");
        assert_eq!(config.openai.max_tokens, 4096);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.step_ms, 500);
        assert_eq!(config.anthropic, FileAnthropicConfig::default());
    }
}
