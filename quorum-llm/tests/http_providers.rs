//! Provider clients against a local stub server.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use quorum_core::{LlmConfig, LlmError, LlmProvider, QuorumError};
use quorum_llm::{AnthropicCompletionClient, CompletionClient, OpenAICompletionClient};
use serde_json::{json, Value};

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(provider: LlmProvider, base_url: String) -> LlmConfig {
    LlmConfig {
        provider,
        model: "test-model".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url),
        temperature: 0.2,
        max_tokens: 256,
        requests_per_minute: 6000,
    }
}

#[tokio::test]
async fn test_openai_sends_system_and_user_messages() {
    let router = Router::new().route(
        "/chat/completions",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["authorization"], "Bearer test-key");
            assert_eq!(body["model"], "test-model");
            assert_eq!(body["messages"][0]["role"], "system");
            assert_eq!(body["messages"][1]["content"], "hello");
            Json(json!({
                "choices": [{"message": {"role": "assistant", "content": "hi there"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
            }))
        }),
    );
    let base = spawn(router).await;
    let client = OpenAICompletionClient::new("test-key", &config(LlmProvider::OpenAi, base));

    let text = client.complete("be brief", "hello").await.unwrap();
    assert_eq!(text, "hi there");
}

#[tokio::test]
async fn test_openai_rate_limit_maps_to_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", "2")],
                Json(json!({"error": {"message": "slow down", "type": "rate_limit"}})),
            )
        }),
    );
    let base = spawn(router).await;
    let client = OpenAICompletionClient::new("test-key", &config(LlmProvider::OpenAi, base));

    let err = client.complete("s", "u").await.unwrap_err();
    assert_eq!(
        err,
        QuorumError::Llm(LlmError::RateLimited {
            provider: "openai".to_string(),
            retry_after_ms: 2000,
        })
    );
}

#[tokio::test]
async fn test_openai_server_error_carries_message() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": {"message": "model overloaded"}})),
            )
        }),
    );
    let base = spawn(router).await;
    let client = OpenAICompletionClient::new("test-key", &config(LlmProvider::OpenAi, base));

    match client.complete("s", "u").await {
        Err(QuorumError::Llm(LlmError::RequestFailed { status, message, .. })) => {
            assert_eq!(status, 500);
            assert_eq!(message, "model overloaded");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_empty_completion_is_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            Json(json!({"choices": [{"message": {"role": "assistant", "content": "  "}}]}))
        }),
    );
    let base = spawn(router).await;
    let client = OpenAICompletionClient::new("test-key", &config(LlmProvider::OpenAi, base));

    let err = client.complete("s", "u").await.unwrap_err();
    assert!(matches!(err, QuorumError::Llm(LlmError::EmptyCompletion { .. })));
}

#[tokio::test]
async fn test_anthropic_sends_headers_and_system_prompt() {
    let router = Router::new().route(
        "/messages",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["x-api-key"], "test-key");
            assert_eq!(headers["anthropic-version"], "2023-06-01");
            assert_eq!(body["system"], "be brief");
            assert_eq!(body["max_tokens"], 256);
            assert_eq!(body["messages"][0]["role"], "user");
            Json(json!({
                "content": [{"type": "text", "text": "{\"ok\": true}"}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 4, "output_tokens": 3}
            }))
        }),
    );
    let base = spawn(router).await;
    let client =
        AnthropicCompletionClient::new("test-key", &config(LlmProvider::Anthropic, base));

    let text = client.complete("be brief", "hello").await.unwrap();
    assert_eq!(text, "{\"ok\": true}");
}

#[tokio::test]
async fn test_unreachable_server_is_request_failure() {
    let client = OpenAICompletionClient::new(
        "test-key",
        &config(LlmProvider::OpenAi, "http://127.0.0.1:1".to_string()),
    );
    let err = client.complete("s", "u").await.unwrap_err();
    assert!(matches!(
        err,
        QuorumError::Llm(LlmError::RequestFailed { status: 0, .. })
    ));
}
