//! Task Board REST API Routes
//!
//! Every route answers 503 when no board is configured.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use quorum_agents::{events, record_event, Coordinator, COORDINATOR_ID};
use quorum_board::{BoardTask, TaskBoard};
use quorum_core::SystemLogEntry;
use quorum_storage::TaskUpdate;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, BoardHandle};
use crate::types::{
    parse_status, parse_task_id, BoardPushResponse, BoardSyncResponse, BoardTasksQuery,
};

/// Task metadata key holding the board page id after a push.
pub const BOARD_PAGE_KEY: &str = "board_page_id";

fn require_board(board: BoardHandle) -> ApiResult<Arc<dyn TaskBoard>> {
    board.ok_or_else(ApiError::board_not_configured)
}

/// POST /api/board/tasks/{id}/push - Mirror a stored task onto the board
///
/// The task's notes, when present, are posted as a page comment.
#[utoipa::path(
    post,
    path = "/api/board/tasks/{id}/push",
    tag = "Board",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task pushed", body = BoardPushResponse),
        (status = 404, description = "Task not found", body = ApiError),
        (status = 502, description = "Board request failed", body = ApiError),
        (status = 503, description = "No board configured", body = ApiError),
    ),
)]
pub async fn push_task(
    State(coordinator): State<Arc<Coordinator>>,
    State(board): State<BoardHandle>,
    Path(id): Path<String>,
) -> ApiResult<Json<BoardPushResponse>> {
    let board = require_board(board)?;
    let task = coordinator.get_task(parse_task_id(&id)?)?;

    let page_id = board.push_task(&task).await?;
    if let Some(notes) = task.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        if let Err(e) = board.add_comment(&page_id, notes).await {
            tracing::warn!(task_id = %task.id, page_id = %page_id, error = %e, "Failed to post notes comment");
        }
    }

    let mut metadata = task.metadata.clone();
    metadata.insert(BOARD_PAGE_KEY.to_string(), Value::String(page_id.clone()));
    coordinator.update_task(
        task.id,
        TaskUpdate {
            metadata: Some(metadata),
            ..TaskUpdate::default()
        },
    )?;

    record_event(
        coordinator.storage().as_ref(),
        SystemLogEntry::new(
            events::BOARD_PUSHED,
            COORDINATOR_ID,
            Some(task.id),
            format!("Task pushed to {}", board.name()),
            json!({ "page_id": page_id, "board": board.name() }),
        ),
    );

    Ok(Json(BoardPushResponse {
        task_id: task.id,
        page_id,
        board: board.name().to_string(),
    }))
}

/// POST /api/board/tasks/{id}/sync - Copy a pushed task's status to its board entry
#[utoipa::path(
    post,
    path = "/api/board/tasks/{id}/sync",
    tag = "Board",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Board status updated", body = BoardSyncResponse),
        (status = 400, description = "Task was never pushed", body = ApiError),
        (status = 404, description = "Task not found", body = ApiError),
        (status = 502, description = "Board request failed", body = ApiError),
        (status = 503, description = "No board configured", body = ApiError),
    ),
)]
pub async fn sync_status(
    State(coordinator): State<Arc<Coordinator>>,
    State(board): State<BoardHandle>,
    Path(id): Path<String>,
) -> ApiResult<Json<BoardSyncResponse>> {
    let board = require_board(board)?;
    let task = coordinator.get_task(parse_task_id(&id)?)?;
    let page_id = task
        .metadata
        .get(BOARD_PAGE_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ApiError::invalid_input(format!("Task {} has not been pushed to the board", task.id))
        })?;

    board.update_status(&page_id, task.status).await?;

    record_event(
        coordinator.storage().as_ref(),
        SystemLogEntry::new(
            events::BOARD_SYNCED,
            COORDINATOR_ID,
            Some(task.id),
            format!("Board status set to {}", task.status),
            json!({ "page_id": page_id, "board": board.name(), "status": task.status }),
        ),
    );

    Ok(Json(BoardSyncResponse {
        task_id: task.id,
        page_id,
        board: board.name().to_string(),
        status: task.status,
    }))
}

/// GET /api/board/tasks - Entries currently on the board
#[utoipa::path(
    get,
    path = "/api/board/tasks",
    tag = "Board",
    params(BoardTasksQuery),
    responses(
        (status = 200, description = "Board entries", body = Vec<BoardTask>),
        (status = 400, description = "Invalid status", body = ApiError),
        (status = 503, description = "No board configured", body = ApiError),
    ),
)]
pub async fn list_tasks(
    State(board): State<BoardHandle>,
    Query(query): Query<BoardTasksQuery>,
) -> ApiResult<Json<Vec<BoardTask>>> {
    let board = require_board(board)?;
    let status = query.status.as_deref().map(parse_status).transpose()?;
    Ok(Json(board.list_tasks(status).await?))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/:id/push", post(push_task))
        .route("/tasks/:id/sync", post(sync_status))
}
