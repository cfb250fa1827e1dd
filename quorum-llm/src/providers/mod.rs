//! LLM provider implementations
//!
//! Concrete [`crate::CompletionClient`] implementations for hosted services,
//! plus the shared request throttle and error helpers they use.

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicCompletionClient;
pub use openai::OpenAICompletionClient;

use quorum_core::{LlmError, QuorumError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

pub(crate) fn request_failed(provider: &str, status: i32, message: impl Into<String>) -> QuorumError {
    LlmError::RequestFailed {
        provider: provider.to_string(),
        status,
        message: message.into(),
    }
    .into()
}

pub(crate) fn rate_limited(provider: &str, retry_after_ms: i64) -> QuorumError {
    LlmError::RateLimited {
        provider: provider.to_string(),
        retry_after_ms,
    }
    .into()
}

pub(crate) fn invalid_response(provider: &str, reason: impl Into<String>) -> QuorumError {
    LlmError::InvalidResponse {
        provider: provider.to_string(),
        reason: reason.into(),
    }
    .into()
}

pub(crate) fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<i64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<f64>().ok())
        .map(|seconds| (seconds * 1000.0) as i64)
}

const NEVER: u64 = u64::MAX;

/// Client-side throttle: bounded concurrency plus a minimum spacing between
/// request starts. Never retries.
#[derive(Debug)]
pub(crate) struct RequestThrottle {
    permits: Semaphore,
    last_request_ms: AtomicU64,
    min_interval_ms: u64,
    start_time: Instant,
}

impl RequestThrottle {
    pub(crate) fn new(requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        Self {
            permits: Semaphore::new(rpm as usize),
            last_request_ms: AtomicU64::new(NEVER),
            min_interval_ms: (60_000 / rpm as u64).max(10),
            start_time: Instant::now(),
        }
    }

    /// Wait for a permit and for the minimum interval to pass. The permit is
    /// held until the returned guard is dropped.
    pub(crate) async fn acquire(
        &self,
        provider: &str,
    ) -> Result<tokio::sync::SemaphorePermit<'_>, QuorumError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| request_failed(provider, 0, format!("Rate limiter error: {}", e)))?;

        let now_ms = self.start_time.elapsed().as_millis() as u64;
        let last_ms = self.last_request_ms.load(Ordering::Relaxed);
        let elapsed = now_ms.saturating_sub(last_ms);
        if last_ms != NEVER && elapsed < self.min_interval_ms {
            let wait_ms = self.min_interval_ms - elapsed;
            tracing::debug!(provider, wait_ms, "Throttling completion request");
            tokio::time::sleep(Duration::from_millis(wait_ms)).await;
        }
        self.last_request_ms
            .store(self.start_time.elapsed().as_millis() as u64, Ordering::Relaxed);

        Ok(permit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after_ms(&headers), None);
        headers.insert("retry-after", HeaderValue::from_static("1.5"));
        assert_eq!(parse_retry_after_ms(&headers), Some(1500));
    }

    #[test]
    fn test_helpers_map_to_llm_errors() {
        assert!(matches!(
            request_failed("openai", 500, "boom"),
            QuorumError::Llm(LlmError::RequestFailed { status: 500, .. })
        ));
        assert!(matches!(
            rate_limited("anthropic", 100),
            QuorumError::Llm(LlmError::RateLimited { retry_after_ms: 100, .. })
        ));
        assert!(matches!(
            invalid_response("openai", "bad"),
            QuorumError::Llm(LlmError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_throttle_spaces_requests() {
        let throttle = RequestThrottle::new(600);
        let started = Instant::now();
        drop(throttle.acquire("test").await.unwrap());
        drop(throttle.acquire("test").await.unwrap());
        assert!(started.elapsed() >= Duration::from_millis(90));
    }
}
