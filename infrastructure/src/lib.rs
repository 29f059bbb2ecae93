//! Infrastructure layer for consensus-quorum
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: HTTP provider adapters for Anthropic, OpenAI and
//! Gemini, TOML/env configuration loading, and the JSONL usage log.

pub mod config;
pub mod logging;
pub mod providers;

pub use config::{
    ConfigLoader, ConfigValidationError, FileCacheConfig, FileConfig, FileConsensusConfig,
    FileEscalationConfig, FileLoggingConfig, FileOutputConfig, FileProvidersConfig,
    FileTierConfig,
};
pub use logging::JsonlUsageLogger;
pub use providers::{
    AnthropicAdapter, ApiCredential, GeminiAdapter, OpenAiAdapter, RetryPolicy, build_registry,
};
