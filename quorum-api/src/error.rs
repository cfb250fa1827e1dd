//! Error Types for QUORUM API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quorum_core::{
    AgentError, BoardError, ConfigError, LlmError, QuorumError, StorageError, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    /// Field format is incorrect
    InvalidFormat,

    /// Update request carries no fields
    EmptyUpdate,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested entity does not exist
    EntityNotFound,

    /// No agent is registered for the requested project
    AgentNotFound,

    // ========================================================================
    // Upstream Errors (502, 503)
    // ========================================================================
    /// The task board rejected or failed the request
    BoardError,

    /// No task board is configured
    BoardNotConfigured,

    /// The language model provider failed
    LlmError,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Storage operation failed
    StorageError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput
            | ErrorCode::MissingField
            | ErrorCode::InvalidFormat
            | ErrorCode::EmptyUpdate => StatusCode::BAD_REQUEST,

            ErrorCode::EntityNotFound | ErrorCode::AgentNotFound => StatusCode::NOT_FOUND,

            ErrorCode::BoardError | ErrorCode::LlmError => StatusCode::BAD_GATEWAY,

            ErrorCode::BoardNotConfigured => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::InternalError | ErrorCode::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::EmptyUpdate => "No fields to update",
            ErrorCode::EntityNotFound => "Entity not found",
            ErrorCode::AgentNotFound => "Agent not found",
            ErrorCode::BoardError => "Task board request failed",
            ErrorCode::BoardNotConfigured => "No task board configured",
            ErrorCode::LlmError => "Language model request failed",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage operation failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response returned by every endpoint on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (field errors, valid values, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Field '{}' has invalid format, expected {}", field, expected),
        )
        .with_details(serde_json::json!({ "field": field, "expected": expected }))
    }

    /// An enumerated field received a value outside its set.
    pub fn invalid_enum(field: &str, value: &str, valid_values: &str) -> Self {
        Self::invalid_input(format!("Invalid {}: {}", field, value)).with_details(
            serde_json::json!({
                "field": field,
                "value": value,
                "valid_values": valid_values,
            }),
        )
    }

    pub fn entity_not_found(entity_type: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EntityNotFound,
            format!("{} with id {} not found", entity_type, id),
        )
    }

    pub fn agent_not_found(project: &str) -> Self {
        Self::new(
            ErrorCode::AgentNotFound,
            format!("No agent registered for project {}", project),
        )
    }

    pub fn board_not_configured() -> Self {
        Self::from_code(ErrorCode::BoardNotConfigured)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<QuorumError> for ApiError {
    fn from(err: QuorumError) -> Self {
        match err {
            QuorumError::Storage(StorageError::NotFound { entity_type, id }) => {
                ApiError::entity_not_found(&format!("{:?}", entity_type), id)
            }
            QuorumError::Storage(e) => {
                tracing::error!(error = %e, "Storage error");
                ApiError::new(ErrorCode::StorageError, e.to_string())
            }
            QuorumError::Validation(ValidationError::RequiredFieldMissing { field }) => {
                ApiError::missing_field(&field)
            }
            QuorumError::Validation(e @ ValidationError::EmptyUpdate { .. }) => {
                ApiError::new(ErrorCode::EmptyUpdate, e.to_string())
            }
            QuorumError::Validation(e @ ValidationError::InvalidValue { .. }) => {
                ApiError::invalid_input(e.to_string())
            }
            QuorumError::Agent(AgentError::NoAgentAvailable { project }) => {
                ApiError::agent_not_found(&project)
            }
            QuorumError::Agent(e @ AgentError::DuplicateAgent { .. }) => {
                ApiError::internal_error(e.to_string())
            }
            QuorumError::Board(BoardError::NotConfigured) => ApiError::board_not_configured(),
            QuorumError::Board(e) => {
                tracing::warn!(error = %e, "Board error");
                ApiError::new(ErrorCode::BoardError, e.to_string())
            }
            QuorumError::Llm(e) => {
                tracing::warn!(error = %e, "LLM error");
                let message = match e {
                    LlmError::ProviderNotConfigured => ErrorCode::LlmError.default_message().to_string(),
                    other => other.to_string(),
                };
                ApiError::new(ErrorCode::LlmError, message)
            }
            QuorumError::Config(e) => {
                let message = match &e {
                    ConfigError::MissingRequired { field } => format!("Missing configuration: {}", field),
                    other => other.to_string(),
                };
                ApiError::internal_error(message)
            }
        }
    }
}

/// Convert from uuid::Error to ApiError.
impl From<uuid::Error> for ApiError {
    fn from(err: uuid::Error) -> Self {
        ApiError::invalid_format("id", &format!("valid UUID: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
