//! Anthropic completion client implementation

use super::client::AnthropicClient;
use super::types::{Message, MessageRequest, MessageResponse};
use crate::CompletionClient;
use async_trait::async_trait;
use quorum_core::{LlmConfig, LlmError, QuorumResult};

/// Completion client backed by the Anthropic messages endpoint.
pub struct AnthropicCompletionClient {
    client: AnthropicClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicCompletionClient {
    pub fn new(api_key: impl Into<String>, config: &LlmConfig) -> Self {
        let mut client = AnthropicClient::new(api_key, config.requests_per_minute);
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
impl CompletionClient for AnthropicCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> QuorumResult<String> {
        let request = MessageRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            max_tokens: self.max_tokens,
            system: Some(system.to_string()),
            temperature: Some(self.temperature),
        };

        let response: MessageResponse = self.client.request("messages", &request).await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyCompletion {
                provider: "anthropic".to_string(),
            }
            .into());
        }
        Ok(text)
    }

    fn provider(&self) -> &str {
        "anthropic"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for AnthropicCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicCompletionClient")
            .field("model", &self.model)
            .finish()
    }
}
