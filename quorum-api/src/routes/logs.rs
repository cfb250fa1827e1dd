//! Audit Log REST API Route

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use quorum_agents::Coordinator;
use quorum_core::SystemLogEntry;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::LogsQuery;

/// GET /api/logs - Audit entries, newest first
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Audit",
    params(LogsQuery),
    responses(
        (status = 200, description = "Audit entries", body = Vec<SystemLogEntry>),
        (status = 400, description = "Invalid limit", body = ApiError),
    ),
)]
pub async fn list_logs(
    State(coordinator): State<Arc<Coordinator>>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<Vec<SystemLogEntry>>> {
    let filter = query.into_filter()?;
    Ok(Json(coordinator.logs(&filter)?))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/", get(list_logs))
}
