//! OpenAI completion client implementation

use super::client::OpenAIClient;
use super::types::{CompletionRequest, CompletionResponse, Message};
use crate::providers::invalid_response;
use crate::CompletionClient;
use async_trait::async_trait;
use quorum_core::{LlmConfig, LlmError, QuorumResult};

/// Completion client backed by the OpenAI chat-completions endpoint.
pub struct OpenAICompletionClient {
    client: OpenAIClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAICompletionClient {
    pub fn new(api_key: impl Into<String>, config: &LlmConfig) -> Self {
        let mut client = OpenAIClient::new(api_key, config.requests_per_minute);
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url.as_str());
        }
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAICompletionClient {
    async fn complete(&self, system: &str, user: &str) -> QuorumResult<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        };

        let response: CompletionResponse =
            self.client.request("chat/completions", &request).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| invalid_response("openai", "No completion in response"))?
            .message
            .content
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyCompletion {
                provider: "openai".to_string(),
            }
            .into());
        }
        Ok(text)
    }

    fn provider(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for OpenAICompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompletionClient")
            .field("model", &self.model)
            .finish()
    }
}
