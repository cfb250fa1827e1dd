//! Task REST API Routes
//!
//! Creating a task immediately routes it to its project's agent.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use quorum_agents::Coordinator;
use quorum_core::Task;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{
    parse_task_id, CreateTaskRequest, CreateTaskResponse, DeleteResponse, ListTasksQuery,
    UpdateTaskRequest,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/tasks - Create a task and assign it to its agent
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created and assigned", body = CreateTaskResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "No agent for the project", body = ApiError),
    ),
)]
pub async fn create_task(
    State(coordinator): State<Arc<Coordinator>>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    let new_task = req.into_new_task()?;
    let task = coordinator.create_task(new_task)?;
    let assignment = coordinator.assign_task(&task).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            success: true,
            task: assignment.task,
            agent_response: assignment.result,
        }),
    ))
}

/// GET /api/tasks - List tasks, newest first
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Matching tasks", body = Vec<Task>),
        (status = 400, description = "Invalid filter", body = ApiError),
    ),
)]
pub async fn list_tasks(
    State(coordinator): State<Arc<Coordinator>>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = query.into_filter()?;
    Ok(Json(coordinator.list_tasks(&filter)?))
}

/// GET /api/tasks/{id} - Get a task
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task", body = Task),
        (status = 400, description = "Malformed id", body = ApiError),
        (status = 404, description = "Task not found", body = ApiError),
    ),
)]
pub async fn get_task(
    State(coordinator): State<Arc<Coordinator>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = parse_task_id(&id)?;
    Ok(Json(coordinator.get_task(id)?))
}

/// PUT /api/tasks/{id} - Partially update a task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = String, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 400, description = "Empty or invalid update", body = ApiError),
        (status = 404, description = "Task not found", body = ApiError),
    ),
)]
pub async fn update_task(
    State(coordinator): State<Arc<Coordinator>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let id = parse_task_id(&id)?;
    let update = req.into_update()?;
    Ok(Json(coordinator.update_task(id, update)?))
}

/// DELETE /api/tasks/{id} - Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted", body = DeleteResponse),
        (status = 404, description = "Task not found", body = ApiError),
    ),
)]
pub async fn delete_task(
    State(coordinator): State<Arc<Coordinator>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_task_id(&id)?;
    coordinator.delete_task(id)?;
    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Task {} deleted", id),
    }))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
}
