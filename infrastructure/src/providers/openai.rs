//! OpenAI Chat Completions adapter (JSON response format)

use super::http::{self, ApiCredential};
use super::retry::RetryPolicy;
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use quorum_application::ports::provider_adapter::{ProviderAdapter, ProviderError};
use quorum_domain::{CallRequest, ProviderFamily};
use serde_json::{Value, json};
use tracing::debug;

pub struct OpenAiAdapter {
    client: reqwest::Client,
    credential: ApiCredential,
    base_url: String,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl OpenAiAdapter {
    pub fn new(client: reqwest::Client, config: &FileOpenAiConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            credential: ApiCredential::new(&config.api_key_env, config.api_key.clone()),
            base_url: config.base_url.clone(),
            max_tokens: config.max_tokens,
            retry,
        }
    }

    fn request_body(&self, model_id: &str, request: &CallRequest) -> Value {
        json!({
            "model": model_id,
            "temperature": request.temperature,
            "max_completion_tokens": self.max_tokens,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.rendered_user_prompt() }
            ],
        })
    }
}

fn reply_text(body: &Value) -> Result<String, ProviderError> {
    http::text_at(body, "/choices/0/message/content").map(str::to_string)
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::OpenAi
    }

    fn is_available(&self) -> bool {
        self.credential.resolve().is_some()
    }

    async fn submit(&self, model_id: &str, request: &CallRequest) -> Result<Value, ProviderError> {
        let key = self.credential.require()?;
        let url = http::endpoint(&self.base_url, "/v1/chat/completions");
        let body = self.request_body(model_id, request);
        let label = format!("openai/{}", model_id);

        let (client, key, url, body) = (&self.client, key.as_str(), url.as_str(), &body);

        let timeout = self.retry.attempt_timeout(request.timeout);
        self.retry
            .run(&label, move |attempt| async move {
                debug!(model = %model_id, attempt, "Calling OpenAI Chat Completions API");
                let builder = client.post(url).bearer_auth(key).json(body);
                let reply = http::send_json(builder, timeout).await?;
                http::payload_from_reply(&reply_text(&reply)?, request)
            })
            .await
    }
}
