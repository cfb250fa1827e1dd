//! Project REST API Routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use quorum_agents::{Coordinator, ProjectStatus};
use quorum_core::{Project, Task, TaskFilter};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{parse_project, ProjectInfo};

/// GET /api/projects - Project catalogue with bound agents
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "All projects", body = Vec<ProjectInfo>),
    ),
)]
pub async fn list_projects(State(coordinator): State<Arc<Coordinator>>) -> Json<Vec<ProjectInfo>> {
    let projects = Project::ALL
        .into_iter()
        .map(|project| ProjectInfo {
            id: project,
            name: project.display_name().to_string(),
            description: project.description().to_string(),
            agent: coordinator.get_agent(project).map(|a| a.id().to_string()),
        })
        .collect();
    Json(projects)
}

/// GET /api/projects/{project}/tasks - Tasks of one project, newest first
#[utoipa::path(
    get,
    path = "/api/projects/{project}/tasks",
    tag = "Projects",
    params(("project" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project tasks", body = Vec<Task>),
        (status = 400, description = "Unknown project", body = ApiError),
    ),
)]
pub async fn project_tasks(
    State(coordinator): State<Arc<Coordinator>>,
    Path(project): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    let project = parse_project(&project)?;
    Ok(Json(coordinator.list_tasks(&TaskFilter::project(project))?))
}

/// GET /api/projects/{project}/status - Task counts and agent activity
#[utoipa::path(
    get,
    path = "/api/projects/{project}/status",
    tag = "Projects",
    params(("project" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project status", body = ProjectStatus),
        (status = 400, description = "Unknown project", body = ApiError),
    ),
)]
pub async fn project_status(
    State(coordinator): State<Arc<Coordinator>>,
    Path(project): Path<String>,
) -> ApiResult<Json<ProjectStatus>> {
    let project = parse_project(&project)?;
    Ok(Json(coordinator.project_status(project)?))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects))
        .route("/:project/tasks", get(project_tasks))
        .route("/:project/status", get(project_status))
}
