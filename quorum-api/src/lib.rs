//! QUORUM API - REST Layer
//!
//! Exposes the coordinator, its agents, the audit log and the optional task
//! board over HTTP (Axum), with an OpenAPI document generated by utoipa.

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;

use std::sync::Arc;

use quorum_agents::Coordinator;
use quorum_core::QuorumConfig;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::{build_cors_layer, create_api_router};
pub use state::{AppState, BoardHandle};

/// Open the store, build the completion client and the coordinator, and
/// attach the configured board.
pub fn build_state(config: &QuorumConfig) -> ApiResult<AppState> {
    config.validate()?;

    let storage = quorum_storage::open_storage(&config.storage)?;
    let client = quorum_llm::build_client(&config.llm)?;
    let coordinator = Coordinator::with_default_roster(storage, client)?;
    let board = quorum_board::build_board(config.board.as_ref());

    tracing::info!(
        provider = config.llm.provider.as_str(),
        model = %config.llm.model,
        agents = coordinator.agent_count(),
        board = board.is_some(),
        "Application state ready"
    );
    Ok(AppState::new(Arc::new(coordinator), board))
}
