//! Agent REST API Routes
//!
//! Agents are addressed by the project they serve. A path segment that is
//! not a known project has no agent and yields 404.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use quorum_agents::{Agent, AgentStatusReport, Coordinator};
use quorum_core::{MemorySnapshot, Project};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{AgentInfoResponse, ChatRequest, ChatResponse, ContextRequest, ContextResponse};

fn resolve_agent<'a>(coordinator: &'a Coordinator, project: &str) -> ApiResult<&'a Agent> {
    let parsed = Project::from_db_str(project.trim())
        .map_err(|_| ApiError::agent_not_found(project))?;
    Ok(coordinator.agent_for(parsed)?)
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/agents - Status of every registered agent
#[utoipa::path(
    get,
    path = "/api/agents",
    tag = "Agents",
    responses(
        (status = 200, description = "Agent statuses keyed by project", body = BTreeMap<String, AgentStatusReport>),
    ),
)]
pub async fn list_agents(
    State(coordinator): State<Arc<Coordinator>>,
) -> ApiResult<Json<BTreeMap<Project, AgentStatusReport>>> {
    Ok(Json(coordinator.get_all_agents_status()?))
}

/// GET /api/agents/{project} - Agent personality and memory
#[utoipa::path(
    get,
    path = "/api/agents/{project}",
    tag = "Agents",
    params(("project" = String, Path, description = "Project the agent serves")),
    responses(
        (status = 200, description = "Agent info", body = AgentInfoResponse),
        (status = 404, description = "No agent for the project", body = ApiError),
    ),
)]
pub async fn get_agent(
    State(coordinator): State<Arc<Coordinator>>,
    Path(project): Path<String>,
) -> ApiResult<Json<AgentInfoResponse>> {
    let agent = resolve_agent(&coordinator, &project)?;
    Ok(Json(AgentInfoResponse {
        agent_id: agent.id().to_string(),
        project: agent.project(),
        personality: agent.personality().clone(),
        memory: agent.memory_snapshot()?,
    }))
}

/// POST /api/agents/{project}/chat - Free-form conversation with an agent
#[utoipa::path(
    post,
    path = "/api/agents/{project}/chat",
    tag = "Agents",
    params(("project" = String, Path, description = "Project the agent serves")),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Agent reply", body = ChatResponse),
        (status = 400, description = "Empty message", body = ApiError),
        (status = 404, description = "No agent for the project", body = ApiError),
    ),
)]
pub async fn chat(
    State(coordinator): State<Arc<Coordinator>>,
    Path(project): Path<String>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let agent = resolve_agent(&coordinator, &project)?;
    let message = req.message()?;
    let reply = agent.chat(&message).await?;
    Ok(Json(ChatResponse {
        agent_id: agent.id().to_string(),
        user_message: message,
        agent_response: reply,
        timestamp: Utc::now(),
    }))
}

/// GET /api/agents/{project}/memory - Bounded view of an agent's memory
#[utoipa::path(
    get,
    path = "/api/agents/{project}/memory",
    tag = "Agents",
    params(("project" = String, Path, description = "Project the agent serves")),
    responses(
        (status = 200, description = "Memory snapshot", body = MemorySnapshot),
        (status = 404, description = "No agent for the project", body = ApiError),
    ),
)]
pub async fn get_memory(
    State(coordinator): State<Arc<Coordinator>>,
    Path(project): Path<String>,
) -> ApiResult<Json<MemorySnapshot>> {
    let agent = resolve_agent(&coordinator, &project)?;
    Ok(Json(agent.memory_snapshot()?))
}

/// POST /api/agents/{project}/context - Replace an agent's standing context
#[utoipa::path(
    post,
    path = "/api/agents/{project}/context",
    tag = "Agents",
    params(("project" = String, Path, description = "Project the agent serves")),
    request_body = ContextRequest,
    responses(
        (status = 200, description = "Context updated", body = ContextResponse),
        (status = 400, description = "Empty context", body = ApiError),
        (status = 404, description = "No agent for the project", body = ApiError),
    ),
)]
pub async fn update_context(
    State(coordinator): State<Arc<Coordinator>>,
    Path(project): Path<String>,
    Json(req): Json<ContextRequest>,
) -> ApiResult<Json<ContextResponse>> {
    let agent = resolve_agent(&coordinator, &project)?;
    let context = req.context()?;
    agent.update_context(&context)?;
    Ok(Json(ContextResponse {
        success: true,
        agent_id: agent.id().to_string(),
        message: "Context updated".to_string(),
    }))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_agents))
        .route("/:project", get(get_agent))
        .route("/:project/chat", post(chat))
        .route("/:project/memory", get(get_memory))
        .route("/:project/context", post(update_context))
}
