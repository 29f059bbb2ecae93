//! HTTP provider adapters
//!
//! One [`ProviderAdapter`](quorum_application::ProviderAdapter) per backend
//! family. Each adapter extracts JSON from the model reply with
//! [`extract`] heuristics, validates it against the request's output schema,
//! and retries with [`retry::RetryPolicy`] before giving up.

pub mod anthropic;
pub mod extract;
pub mod gemini;
pub mod http;
pub mod openai;
pub mod retry;
#[cfg(test)]
pub(crate) mod stub;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use http::ApiCredential;
pub use openai::OpenAiAdapter;
pub use retry::RetryPolicy;

use crate::config::FileProvidersConfig;
use quorum_application::{AdapterRegistry, ProviderError};
use std::sync::Arc;
use tracing::info;

const USER_AGENT: &str = concat!("consensus-quorum/", env!("CARGO_PKG_VERSION"));

/// Build the registry with every known adapter.
///
/// Adapters without a credential are still registered; the orchestrator
/// skips them through `is_available`.
pub fn build_registry(config: &FileProvidersConfig) -> Result<AdapterRegistry, ProviderError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ProviderError::Transport(format!("Failed to create HTTP client: {}", e)))?;

    let registry = AdapterRegistry::new()
        .with(Arc::new(AnthropicAdapter::new(
            client.clone(),
            &config.anthropic,
            config.retry,
        )))
        .with(Arc::new(OpenAiAdapter::new(
            client.clone(),
            &config.openai,
            config.retry,
        )))
        .with(Arc::new(GeminiAdapter::new(client, &config.gemini, config.retry)));

    let available = registry.available_families();
    info!(
        "Registered {} provider adapters ({} with credentials: {:?})",
        registry.len(),
        available.len(),
        available
    );
    Ok(registry)
}
