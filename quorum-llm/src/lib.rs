//! QUORUM LLM - Completion Client Boundary
//!
//! Provider-agnostic trait for text completion, the concrete OpenAI and
//! Anthropic clients, and a scripted mock for tests and offline runs.

pub mod providers;

pub use providers::{AnthropicCompletionClient, OpenAICompletionClient};

use async_trait::async_trait;
use quorum_core::{LlmConfig, LlmError, LlmProvider, QuorumError, QuorumResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// COMPLETION CLIENT TRAIT
// ============================================================================

/// Trait for text completion services.
/// Implementations must be thread-safe (Send + Sync).
///
/// Every failure is reported as an error value; callers decide how to
/// recover.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate text for a system instruction and a user message.
    async fn complete(&self, system: &str, user: &str) -> QuorumResult<String>;

    /// Provider name used in logs and errors (e.g., "openai").
    fn provider(&self) -> &str;

    /// Model identifier (e.g., "gpt-4.1-mini").
    fn model_id(&self) -> &str;
}

/// Build the client selected by the configuration.
///
/// Callers are expected to have run `QuorumConfig::validate` first.
pub fn build_client(config: &LlmConfig) -> QuorumResult<Arc<dyn CompletionClient>> {
    let client: Arc<dyn CompletionClient> = match config.provider {
        LlmProvider::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .ok_or(LlmError::ProviderNotConfigured)?;
            Arc::new(OpenAICompletionClient::new(api_key, config))
        }
        LlmProvider::Anthropic => {
            let api_key = config
                .api_key
                .clone()
                .ok_or(LlmError::ProviderNotConfigured)?;
            Arc::new(AnthropicCompletionClient::new(api_key, config))
        }
        LlmProvider::Mock => Arc::new(MockCompletionClient::new()),
    };
    tracing::info!(
        provider = client.provider(),
        model = client.model_id(),
        "Completion client ready"
    );
    Ok(client)
}

// ============================================================================
// MOCK CLIENT
// ============================================================================

/// Recorded call made against [`MockCompletionClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
}

/// Scripted completion client for testing.
///
/// Responses are served from a queue in order. When the queue is empty the
/// default response is returned, or an error if the client is set to fail.
#[derive(Debug)]
pub struct MockCompletionClient {
    model: String,
    default_response: String,
    fail_when_empty: bool,
    queue: Mutex<VecDeque<QuorumResult<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Response returned by the mock when nothing is scripted.
pub const MOCK_DEFAULT_RESPONSE: &str = r#"{"analysis":"Mock analysis","action_plan":["Review the task"],"subtasks":[],"next_steps":["Start"],"suggested_status":"in_progress","notes":"mock"}"#;

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            default_response: MOCK_DEFAULT_RESPONSE.to_string(),
            fail_when_empty: false,
            queue: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every unscripted call fails.
    pub fn failing() -> Self {
        Self {
            fail_when_empty: true,
            ..Self::new()
        }
    }

    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Queue a successful response.
    pub fn push_response(&self, response: impl Into<String>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Ok(response.into()));
        }
    }

    /// Queue a failure.
    pub fn push_error(&self, error: impl Into<QuorumError>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(Err(error.into()));
        }
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> QuorumResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system: system.to_string(),
                user: user.to_string(),
            });
        }
        let scripted = self.queue.lock().ok().and_then(|mut q| q.pop_front());
        match scripted {
            Some(result) => result,
            None if self.fail_when_empty => Err(LlmError::RequestFailed {
                provider: "mock".to_string(),
                status: 503,
                message: "mock client set to fail".to_string(),
            }
            .into()),
            None => Ok(self.default_response.clone()),
        }
    }

    fn provider(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// TESTS
// ============================================================================
