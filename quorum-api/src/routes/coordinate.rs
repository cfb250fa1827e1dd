//! Coordination REST API Routes

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use quorum_agents::{Assignment, Coordinator, SystemReport};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::AssignRequest;

/// POST /api/coordinate/assign - Route a stored task to a project's agent
///
/// The task is moved to `project` first when it belongs elsewhere.
#[utoipa::path(
    post,
    path = "/api/coordinate/assign",
    tag = "Coordination",
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Task assigned", body = Assignment),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Task or agent not found", body = ApiError),
    ),
)]
pub async fn assign(
    State(coordinator): State<Arc<Coordinator>>,
    Json(req): Json<AssignRequest>,
) -> ApiResult<Json<Assignment>> {
    let (task_id, project) = req.parse()?;
    Ok(Json(coordinator.reassign_task(task_id, project).await?))
}

/// GET /api/coordinate/report - Whole-system summary
#[utoipa::path(
    get,
    path = "/api/coordinate/report",
    tag = "Coordination",
    responses(
        (status = 200, description = "System report", body = SystemReport),
    ),
)]
pub async fn report(State(coordinator): State<Arc<Coordinator>>) -> ApiResult<Json<SystemReport>> {
    Ok(Json(coordinator.generate_report()?))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/assign", post(assign))
        .route("/report", get(report))
}
