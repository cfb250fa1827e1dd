//! Runtime configuration
//!
//! Configuration is read once at startup from environment variables and
//! passed down explicitly. Nothing in the workspace reads the environment
//! after [`QuorumConfig::from_env`] returns.

use crate::{ConfigError, QuorumResult};
use std::path::PathBuf;

/// Which completion provider to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
    /// Scripted offline client, for local development without a key.
    Mock,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Mock => "mock",
        }
    }

    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            "mock" => Ok(LlmProvider::Mock),
            other => Err(ConfigError::ProviderNotSupported {
                provider: other.to_string(),
            }),
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi | LlmProvider::Mock => "gpt-4.1-mini",
            LlmProvider::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

/// Completion client settings.
#[derive(Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: Option<String>,
    /// Overrides the provider's public endpoint.
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub requests_per_minute: u32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("requests_per_minute", &self.requests_per_minute)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            model: LlmProvider::OpenAi.default_model().to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 4096,
            requests_per_minute: 50,
        }
    }
}

/// Which storage backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Lmdb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
    pub max_size_mb: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Lmdb,
            path: PathBuf::from("./quorum-data"),
            max_size_mb: 256,
        }
    }
}

/// Notion-style task board credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub api_key: String,
    pub database_id: String,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for BoardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardConfig")
            .field("api_key", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct QuorumConfig {
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub board: Option<BoardConfig>,
}

impl QuorumConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `QUORUM_LLM_PROVIDER`: `openai`, `anthropic` or `mock` (default: openai)
    /// - `QUORUM_LLM_MODEL`: model id (default depends on provider)
    /// - `QUORUM_LLM_API_KEY`: falls back to `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`
    /// - `QUORUM_LLM_BASE_URL`, `QUORUM_LLM_TEMPERATURE` (0.7),
    ///   `QUORUM_LLM_MAX_TOKENS` (4096), `QUORUM_LLM_REQUESTS_PER_MINUTE` (50)
    /// - `QUORUM_STORAGE_BACKEND`: `memory` or `lmdb` (default: lmdb)
    /// - `QUORUM_STORAGE_PATH` (./quorum-data), `QUORUM_STORAGE_MAX_SIZE_MB` (256)
    /// - `NOTION_API_KEY` and `NOTION_DATABASE_ID`: both or neither
    pub fn from_env() -> QuorumResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> QuorumResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match get("QUORUM_LLM_PROVIDER") {
            Some(v) => LlmProvider::parse(&v)?,
            None => LlmProvider::OpenAi,
        };
        let vendor_key = match provider {
            LlmProvider::OpenAi => get("OPENAI_API_KEY"),
            LlmProvider::Anthropic => get("ANTHROPIC_API_KEY"),
            LlmProvider::Mock => None,
        };
        let llm = LlmConfig {
            provider,
            model: get("QUORUM_LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            api_key: get("QUORUM_LLM_API_KEY").or(vendor_key),
            base_url: get("QUORUM_LLM_BASE_URL"),
            temperature: parse_or(&get, "QUORUM_LLM_TEMPERATURE", 0.7)?,
            max_tokens: parse_or(&get, "QUORUM_LLM_MAX_TOKENS", 4096)?,
            requests_per_minute: parse_or(&get, "QUORUM_LLM_REQUESTS_PER_MINUTE", 50)?,
        };

        let backend = match get("QUORUM_STORAGE_BACKEND").map(|v| v.to_lowercase()) {
            None => StorageBackend::Lmdb,
            Some(v) if v == "lmdb" => StorageBackend::Lmdb,
            Some(v) if v == "memory" => StorageBackend::Memory,
            Some(v) => {
                return Err(ConfigError::InvalidValue {
                    field: "QUORUM_STORAGE_BACKEND".to_string(),
                    value: v,
                    reason: "expected memory or lmdb".to_string(),
                }
                .into())
            }
        };
        let storage = StorageConfig {
            backend,
            path: get("QUORUM_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| StorageConfig::default().path),
            max_size_mb: parse_or(&get, "QUORUM_STORAGE_MAX_SIZE_MB", 256)?,
        };

        let board = match (get("NOTION_API_KEY"), get("NOTION_DATABASE_ID")) {
            (Some(api_key), Some(database_id)) => Some(BoardConfig {
                api_key,
                database_id,
                base_url: get("NOTION_BASE_URL"),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::MissingRequired {
                    field: "NOTION_DATABASE_ID".to_string(),
                }
                .into())
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingRequired {
                    field: "NOTION_API_KEY".to_string(),
                }
                .into())
            }
        };

        Ok(Self { llm, storage, board })
    }

    /// Validate the configuration before any client is built.
    pub fn validate(&self) -> QuorumResult<()> {
        if self.llm.provider != LlmProvider::Mock && self.llm.api_key.is_none() {
            return Err(ConfigError::MissingRequired {
                field: "QUORUM_LLM_API_KEY".to_string(),
            }
            .into());
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "QUORUM_LLM_TEMPERATURE".to_string(),
                value: self.llm.temperature.to_string(),
                reason: "must be between 0.0 and 2.0".to_string(),
            }
            .into());
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "QUORUM_LLM_MAX_TOKENS".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        if self.llm.requests_per_minute == 0 {
            return Err(ConfigError::InvalidValue {
                field: "QUORUM_LLM_REQUESTS_PER_MINUTE".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        if self.storage.backend == StorageBackend::Lmdb && self.storage.max_size_mb == 0 {
            return Err(ConfigError::InvalidValue {
                field: "QUORUM_STORAGE_MAX_SIZE_MB".to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: key.to_string(),
            value: raw,
            reason: "not a valid number".to_string(),
        }),
    }
}
