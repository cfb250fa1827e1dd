//! Health Check Endpoint
//!
//! `/health` checks store connectivity and reports the agent registry size.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use quorum_agents::Coordinator;
use quorum_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::state::{AppState, BoardHandle};

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub database: ComponentHealth,
    /// Number of registered agents.
    pub agents: usize,
    /// Configured task board backend, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    pub version: String,
    pub uptime_seconds: u64,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health - Store connectivity and agent registry check
#[utoipa::path(
    get,
    path = "/health",
    tag = "Service",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse),
    ),
)]
pub async fn health(
    State(coordinator): State<Arc<Coordinator>>,
    State(board): State<BoardHandle>,
    State(start_time): State<std::time::Instant>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = match coordinator.storage().ping() {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Health check: store unreachable");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                error: Some(e.to_string()),
            }
        }
    };

    let (status_code, status) = match database.status {
        HealthStatus::Healthy => (StatusCode::OK, HealthStatus::Healthy),
        HealthStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Unhealthy),
    };

    let response = HealthResponse {
        status,
        database,
        agents: coordinator.agent_count(),
        board: board.as_ref().map(|b| b.name().to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: start_time.elapsed().as_secs(),
        timestamp: Utc::now(),
    };
    (status_code, Json(response))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
