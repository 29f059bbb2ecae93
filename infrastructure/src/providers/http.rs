//! Shared HTTP plumbing for the provider adapters

use super::extract::{Extraction, extract_json};
use quorum_application::ports::provider_adapter::ProviderError;
use quorum_domain::CallRequest;
use quorum_domain::util::excerpt;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Longest error body kept in a [`ProviderError`].
const ERROR_BODY_LIMIT: usize = 500;

/// Longest reply excerpt quoted when no JSON can be found.
const REPLY_EXCERPT_LIMIT: usize = 200;

/// API key source for one provider: an inline key, else an environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredential {
    env_var: String,
    inline: Option<String>,
}

impl ApiCredential {
    pub fn new(env_var: impl Into<String>, inline: Option<String>) -> Self {
        Self {
            env_var: env_var.into(),
            inline,
        }
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    /// The key, if one is configured. Empty values count as absent.
    pub fn resolve(&self) -> Option<String> {
        self.inline
            .as_ref()
            .filter(|key| !key.trim().is_empty())
            .cloned()
            .or_else(|| {
                std::env::var(&self.env_var)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }

    pub fn require(&self) -> Result<String, ProviderError> {
        self.resolve()
            .ok_or_else(|| ProviderError::MissingCredential(self.env_var.clone()))
    }
}

/// Send a JSON request and decode the JSON response body.
///
/// Non-2xx statuses become [`ProviderError::Http`] with a truncated body.
pub(crate) async fn send_json(
    builder: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<Value, ProviderError> {
    let response = builder.timeout(timeout).send().await.map_err(map_reqwest)?;
    let status = response.status();
    let text = response.text().await.map_err(map_reqwest)?;

    if !status.is_success() {
        return Err(ProviderError::Http {
            status: status.as_u16(),
            body: excerpt(&text, ERROR_BODY_LIMIT),
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        ProviderError::MalformedResponse(format!("response body is not JSON: {}", e))
    })
}

fn map_reqwest(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}

/// Turn the model's reply text into a validated payload.
pub(crate) fn payload_from_reply(
    text: &str,
    request: &CallRequest,
) -> Result<Value, ProviderError> {
    let (payload, how) = extract_json(text).ok_or_else(|| {
        ProviderError::MalformedResponse(format!(
            "no JSON value in reply: {}",
            excerpt(text.trim(), REPLY_EXCERPT_LIMIT)
        ))
    })?;

    if how != Extraction::Raw {
        debug!("Recovered JSON payload via {:?}", how);
    }

    if let Some(schema) = &request.output_schema {
        schema.validate(&payload)?;
    }
    Ok(payload)
}

/// Join the base URL and a path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Fetch a string at a JSON pointer, as a malformed-response error when absent.
pub(crate) fn text_at<'a>(body: &'a Value, pointer: &str) -> Result<&'a str, ProviderError> {
    body.pointer(pointer).and_then(Value::as_str).ok_or_else(|| {
        ProviderError::MalformedResponse(format!("missing `{}` in response", pointer))
    })
}
