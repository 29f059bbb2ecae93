//! Gemini `generateContent` adapter (JSON mime type)

use super::http::{self, ApiCredential};
use super::retry::RetryPolicy;
use crate::config::FileGeminiConfig;
use async_trait::async_trait;
use quorum_application::ports::provider_adapter::{ProviderAdapter, ProviderError};
use quorum_domain::{CallRequest, ProviderFamily};
use serde_json::{Value, json};
use tracing::debug;

pub struct GeminiAdapter {
    client: reqwest::Client,
    credential: ApiCredential,
    base_url: String,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, config: &FileGeminiConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            credential: ApiCredential::new(&config.api_key_env, config.api_key.clone()),
            base_url: config.base_url.clone(),
            max_tokens: config.max_tokens,
            retry,
        }
    }

    fn request_body(&self, request: &CallRequest) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": request.system_prompt }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.rendered_user_prompt() }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": self.max_tokens,
                "responseMimeType": "application/json"
            },
        })
    }
}

/// Concatenate the text parts of the first candidate.
fn reply_text(body: &Value) -> Result<String, ProviderError> {
    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            let reason = body
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no candidates");
            ProviderError::MalformedResponse(format!("empty Gemini response ({})", reason))
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        return Err(ProviderError::MalformedResponse(
            "response has no text parts".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::Gemini
    }

    fn is_available(&self) -> bool {
        self.credential.resolve().is_some()
    }

    async fn submit(&self, model_id: &str, request: &CallRequest) -> Result<Value, ProviderError> {
        let key = self.credential.require()?;
        let url = http::endpoint(
            &self.base_url,
            &format!("/v1beta/models/{}:generateContent", model_id),
        );
        let body = self.request_body(request);
        let label = format!("gemini/{}", model_id);

        let (client, key, url, body) = (&self.client, key.as_str(), url.as_str(), &body);

        let timeout = self.retry.attempt_timeout(request.timeout);
        self.retry
            .run(&label, move |attempt| async move {
                debug!(model = %model_id, attempt, "Calling Gemini generateContent");
                let builder = client.post(url).header("x-goog-api-key", key).json(body);
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
    use std::time::Duration;

    fn adapter(api_key: Option<&str>) -> GeminiAdapter {
        let config = FileGeminiConfig {
            api_key_env: "QUORUM_TEST_GEMINI_UNSET".to_string(),
            api_key: api_key.map(String::from),
            ..Default::default()
        };
        GeminiAdapter::new(reqwest::Client::new(), &config, RetryPolicy::none())
    }

    #[test]
    fn test_availability_follows_credential() {
        assert!(!adapter(None).is_available());
        assert!(adapter(Some("g-key")).is_available());
    }

    #[test]
    fn test_request_body_requests_json() {
        let body = adapter(Some("k")).request_body(&CallRequest::new("sys", "q"));
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn test_reply_text() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "[1,"}, {"text": "2]"}]}}]
        });
        assert_eq!(reply_text(&body).unwrap(), "[1,2]");
    }

    #[test]
    fn test_blocked_prompt_reports_reason() {
        let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        match reply_text(&body) {
            Err(ProviderError::MalformedResponse(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let backend = StubBackend::start(vec![
            StubReply::status(400, "{\"error\": {\"message\": \"bad model\"}}"),
            StubReply::ok(json!({"candidates": [{"content": {"parts": [{"text": "{}"}]}}]})),
        ])
        .await;
        let config = FileGeminiConfig {
            api_key_env: "QUORUM_TEST_GEMINI_UNSET".to_string(),
            api_key: Some("g-key".to_string()),
            base_url: backend.url(),
            ..Default::default()
        };
        let adapter = GeminiAdapter::new(
            reqwest::Client::new(),
            &config,
            RetryPolicy::new(3, Duration::ZERO),
        );

        let err = adapter
            .submit("gemini-2.5-flash", &CallRequest::new("s", "u"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Http { status: 400, .. }));
        let seen = backend.requests();
        assert_eq!(seen.len(), 1);
        assert!(
            seen[0]
                .head
                .starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent ")
        );
        assert!(seen[0].head.to_lowercase().contains("x-goog-api-key: g-key"));
    }
}
