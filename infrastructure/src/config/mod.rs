//! Configuration file loading for consensus-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `QUORUM_`-prefixed environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./quorum.toml` or `./.quorum.toml`
//! 4. Global: `$XDG_CONFIG_HOME/consensus-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnthropicConfig, FileCacheConfig, FileConfig,
    FileConsensusConfig, FileEscalationConfig, FileGeminiConfig, FileLoggingConfig,
    FileOpenAiConfig, FileOutputConfig, FileProviderEntry, FileProvidersConfig, FileTierConfig,
    build_catalog,
};
pub use loader::ConfigLoader;
