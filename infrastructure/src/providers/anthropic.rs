//! Anthropic Messages API adapter

use super::http::{self, ApiCredential};
use super::retry::RetryPolicy;
use crate::config::FileAnthropicConfig;
use async_trait::async_trait;
use quorum_application::ports::provider_adapter::{ProviderAdapter, ProviderError};
use quorum_domain::{CallRequest, ProviderFamily};
use serde_json::{Value, json};
use tracing::debug;

pub struct AnthropicAdapter {
    client: reqwest::Client,
    credential: ApiCredential,
    base_url: String,
    api_version: String,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl AnthropicAdapter {
    pub fn new(client: reqwest::Client, config: &FileAnthropicConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            credential: ApiCredential::new(&config.api_key_env, config.api_key.clone()),
            base_url: config.base_url.clone(),
            api_version: config.api_version.clone(),
            max_tokens: config.max_tokens,
            retry,
        }
    }

    fn request_body(&self, model_id: &str, request: &CallRequest) -> Value {
        json!({
            "model": model_id,
            "max_tokens": self.max_tokens,
            "temperature": request.temperature,
            "system": request.system_prompt,
            "messages": [
                { "role": "user", "content": request.rendered_user_prompt() }
            ],
        })
    }
}

/// Concatenate the `text` blocks of a Messages API response.
fn reply_text(body: &Value) -> Result<String, ProviderError> {
    let blocks = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::MalformedResponse("missing `content` array".to_string()))?;

    let text: String = blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(ProviderError::MalformedResponse(
            "response has no text content".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::Anthropic
    }

    fn is_available(&self) -> bool {
        self.credential.resolve().is_some()
    }

    async fn submit(&self, model_id: &str, request: &CallRequest) -> Result<Value, ProviderError> {
        let key = self.credential.require()?;
        let url = http::endpoint(&self.base_url, "/v1/messages");
        let body = self.request_body(model_id, request);
        let label = format!("anthropic/{}", model_id);

        let (client, key, url, body, version) =
            (&self.client, key.as_str(), url.as_str(), &body, self.api_version.as_str());

        let timeout = self.retry.attempt_timeout(request.timeout);
        self.retry
            .run(&label, move |attempt| async move {
                debug!(model = %model_id, attempt, "Calling Anthropic Messages API");
                let builder = client
                    .post(url)
                    .header("x-api-key", key)
                    .header("anthropic-version", version)
                    .json(body);
                let reply = http::send_json(builder, timeout).await?;
                http::payload_from_reply(&reply_text(&reply)?, request)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stub::{StubBackend, StubReply};
    use quorum_domain::{FieldType, OutputSchema};
    use std::time::Duration;

    fn adapter(api_key: Option<&str>) -> AnthropicAdapter {
        let config = FileAnthropicConfig {
            api_key_env: "QUORUM_TEST_ANTHROPIC_UNSET".to_string(),
            api_key: api_key.map(String::from),
            ..Default::default()
        };
        AnthropicAdapter::new(reqwest::Client::new(), &config, RetryPolicy::none())
    }

    #[test]
    fn test_unavailable_without_key() {
        assert!(!adapter(None).is_available());
        assert!(adapter(Some("sk-ant")).is_available());
    }

    #[tokio::test]
    async fn test_submit_without_key_fails_fast() {
        let err = adapter(None)
            .submit("claude-haiku-4-5", &CallRequest::new("s", "u"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::MissingCredential("QUORUM_TEST_ANTHROPIC_UNSET".to_string())
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = CallRequest::new("be terse", "is 2 prime?")
            .with_schema(OutputSchema::new().required("answer", FieldType::Boolean));
        let body = adapter(Some("k")).request_body("claude-sonnet-4-5", &request);

        assert_eq!(body["model"], "claude-sonnet-4-5");
        assert_eq!(body["system"], "be terse");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"][0]["role"], "user");
        let content = body["messages"][0]["content"].as_str().unwrap();
        assert!(content.starts_with("is 2 prime?"));
        assert!(content.contains("\"answer\""));
    }

    #[test]
    fn test_reply_text_joins_text_blocks() {
        let body = json!({
            "content": [
                {"type": "text", "text": "{\"answer\":"},
                {"type": "thinking", "thinking": "ignored"},
                {"type": "text", "text": " true}"}
            ]
        });
        assert_eq!(reply_text(&body).unwrap(), "{\"answer\": true}");
    }

    #[test]
    fn test_reply_text_errors() {
        assert!(matches!(
            reply_text(&json!({"error": "x"})),
            Err(ProviderError::MalformedResponse(_))
        ));
        assert!(matches!(
            reply_text(&json!({"content": []})),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    fn text_reply(text: &str) -> StubReply {
        StubReply::ok(json!({"content": [{"type": "text", "text": text}]}))
    }

    #[tokio::test]
    async fn test_submit_retries_until_reply_matches_schema() {
        let backend = StubBackend::start(vec![
            text_reply("I think the answer is yes."),
            text_reply("{\"verdict\": true}"),
            text_reply("Sure:\n```json\n{\"answer\": true}\n```"),
        ])
        .await;
        let config = FileAnthropicConfig {
            api_key_env: "QUORUM_TEST_ANTHROPIC_UNSET".to_string(),
            api_key: Some("sk-ant".to_string()),
            base_url: backend.url(),
            ..Default::default()
        };
        let adapter = AnthropicAdapter::new(
            reqwest::Client::new(),
            &config,
            RetryPolicy::new(3, Duration::ZERO),
        );
        let request = CallRequest::new("be terse", "is 2 prime?")
            .with_schema(OutputSchema::new().required("answer", FieldType::Boolean));

        let payload = adapter.submit("claude-haiku-4-5", &request).await.unwrap();

        assert_eq!(payload, json!({"answer": true}));
        let seen = backend.requests();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].head.starts_with("POST /v1/messages "));
        assert!(seen[0].head.to_lowercase().contains("x-api-key: sk-ant"));
        assert_eq!(seen[2].body["model"], "claude-haiku-4-5");
    }
}
