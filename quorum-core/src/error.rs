//! Error types for QUORUM operations

use crate::EntityType;
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found: {entity_type:?} with id {id}")]
    NotFound { entity_type: EntityType, id: String },

    #[error("Insert failed for {entity_type:?}: {reason}")]
    InsertFailed {
        entity_type: EntityType,
        reason: String,
    },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Serialization failed for {entity_type:?}: {reason}")]
    Serialization {
        entity_type: EntityType,
        reason: String,
    },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// LLM provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("No LLM provider configured")]
    ProviderNotConfigured,

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Rate limited by {provider}, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: i64,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Empty completion from {provider}")]
    EmptyCompletion { provider: String },
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Nothing to update for {entity_type:?}")]
    EmptyUpdate { entity_type: EntityType },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Provider not supported: {provider}")]
    ProviderNotSupported { provider: String },
}

/// Agent routing errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("No agent available for project {project}")]
    NoAgentAvailable { project: String },

    #[error("Duplicate roster entry: {agent_id} for project {project}")]
    DuplicateAgent { agent_id: String, project: String },
}

/// Task board integration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("No task board configured")]
    NotConfigured,

    #[error("Board request failed with status {status}: {message}")]
    RequestFailed { status: i32, message: String },

    #[error("Invalid board response: {reason}")]
    InvalidResponse { reason: String },
}

/// Master error type for all QUORUM errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuorumError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Board error: {0}")]
    Board(#[from] BoardError),
}

impl QuorumError {
    /// True when the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuorumError::Storage(StorageError::NotFound { .. }))
    }
}

/// Result type alias for QUORUM operations.
pub type QuorumResult<T> = Result<T, QuorumError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_not_found() {
        let err = StorageError::NotFound {
            entity_type: EntityType::Task,
            id: "00000000-0000-0000-0000-000000000000".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Entity not found"));
        assert!(msg.contains("Task"));
        assert!(msg.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_llm_error_display_rate_limited() {
        let err = LlmError::RateLimited {
            provider: "openai".to_string(),
            retry_after_ms: 1500,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Rate limited"));
        assert!(msg.contains("openai"));
        assert!(msg.contains("1500"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "QUORUM_LLM_TEMPERATURE".to_string(),
            value: "hot".to_string(),
            reason: "must be a number".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("QUORUM_LLM_TEMPERATURE"));
        assert!(msg.contains("hot"));
        assert!(msg.contains("must be a number"));
    }

    #[test]
    fn test_agent_error_display_no_agent() {
        let err = AgentError::NoAgentAvailable {
            project: "Unknown".to_string(),
        };
        assert!(err.to_string().contains("No agent available"));
        assert!(err.to_string().contains("Unknown"));
    }

    #[test]
    fn test_quorum_error_from_variants() {
        let storage = QuorumError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, QuorumError::Storage(_)));

        let llm = QuorumError::from(LlmError::ProviderNotConfigured);
        assert!(matches!(llm, QuorumError::Llm(_)));

        let validation = QuorumError::from(ValidationError::RequiredFieldMissing {
            field: "title".to_string(),
        });
        assert!(matches!(validation, QuorumError::Validation(_)));

        let config = QuorumError::from(ConfigError::ProviderNotSupported {
            provider: "test".to_string(),
        });
        assert!(matches!(config, QuorumError::Config(_)));

        let agent = QuorumError::from(AgentError::NoAgentAvailable {
            project: "x".to_string(),
        });
        assert!(matches!(agent, QuorumError::Agent(_)));

        let board = QuorumError::from(BoardError::NotConfigured);
        assert!(matches!(board, QuorumError::Board(_)));
    }

    #[test]
    fn test_is_not_found() {
        let err = QuorumError::from(StorageError::NotFound {
            entity_type: EntityType::AgentMemory,
            id: "MentorEmprendedor".to_string(),
        });
        assert!(err.is_not_found());
        assert!(!QuorumError::from(StorageError::LockPoisoned).is_not_found());
    }
}
