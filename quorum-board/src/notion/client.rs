//! Notion HTTP client

use super::types::ApiError;
use quorum_core::{BoardError, QuorumResult};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Thin authenticated wrapper over the Notion REST API.
pub struct NotionClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send a JSON request and decode the JSON reply.
    pub async fn request<Req: Serialize, Res: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &Req,
    ) -> QuorumResult<Res> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| BoardError::RequestFailed {
                status: 0,
                message: format!("HTTP request failed: {}", e),
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| {
                BoardError::InvalidResponse {
                    reason: format!("Failed to parse response: {}", e),
                }
                .into()
            });
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<ApiError>(&error_text) {
            Ok(api_error) => match api_error.code {
                Some(code) => format!("{}: {}", code, api_error.message),
                None => api_error.message,
            },
            Err(_) => error_text,
        };
        tracing::warn!(status = status.as_u16(), endpoint, %message, "Notion request failed");
        Err(BoardError::RequestFailed {
            status: status.as_u16() as i32,
            message,
        }
        .into())
    }
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let client = NotionClient::new("secret_abc").with_base_url("http://localhost/");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret_abc"));
        assert!(debug.contains("http://localhost"));
    }
}
