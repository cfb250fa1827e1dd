//! Request and response types for the REST API.
//!
//! Enumerated fields arrive as plain strings and are checked here, so a bad
//! project, status, or priority produces `INVALID_INPUT` with the accepted
//! values instead of a generic deserialization failure.

use quorum_agents::TaskAnalysis;
use quorum_core::{
    EntityId, LogFilter, MemorySnapshot, Metadata, NewTask, Personality, Project, Task,
    TaskFilter, TaskPriority, TaskStatus, Timestamp, DEFAULT_LOG_LIMIT,
};
use quorum_storage::TaskUpdate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};

/// Upper bound on a single audit log page.
pub const MAX_LOG_LIMIT: usize = 500;

// ============================================================================
// ENUM PARSING
// ============================================================================

pub fn parse_project(value: &str) -> ApiResult<Project> {
    Project::from_db_str(value.trim())
        .map_err(|_| ApiError::invalid_enum("project", value, &Project::valid_values()))
}

pub fn parse_status(value: &str) -> ApiResult<TaskStatus> {
    TaskStatus::from_db_str(value)
        .map_err(|_| ApiError::invalid_enum("status", value, &TaskStatus::valid_values()))
}

pub fn parse_priority(value: &str) -> ApiResult<TaskPriority> {
    TaskPriority::from_db_str(value)
        .map_err(|_| ApiError::invalid_enum("priority", value, &TaskPriority::valid_values()))
}

pub fn parse_task_id(value: &str) -> ApiResult<EntityId> {
    Ok(value.trim().parse::<EntityId>()?)
}

fn required_text(field: &str, value: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::missing_field(field));
    }
    Ok(value.to_string())
}

// ============================================================================
// TASKS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub project: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to `medium`.
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Metadata>,
}

impl CreateTaskRequest {
    pub fn into_new_task(self) -> ApiResult<NewTask> {
        let project = parse_project(&self.project)?;
        let title = required_text("title", &self.title)?;
        let mut task = NewTask::new(project, title).with_description(self.description);
        if let Some(priority) = self.priority.as_deref() {
            task = task.with_priority(parse_priority(priority)?);
        }
        if let Some(metadata) = self.metadata {
            task.metadata = metadata;
        }
        Ok(task)
    }
}

/// Partial task update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub project: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_agent: Option<String>,
    pub notes: Option<String>,
    pub subtasks: Option<Vec<String>>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Metadata>,
}

impl UpdateTaskRequest {
    pub fn into_update(self) -> ApiResult<TaskUpdate> {
        Ok(TaskUpdate {
            project: self.project.as_deref().map(parse_project).transpose()?,
            title: self.title,
            description: self.description,
            status: self.status.as_deref().map(parse_status).transpose()?,
            priority: self.priority.as_deref().map(parse_priority).transpose()?,
            assigned_agent: self.assigned_agent,
            notes: self.notes,
            subtasks: self.subtasks,
            metadata: self.metadata,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// Only tasks of this project
    pub project: Option<String>,
    /// Only tasks in this status
    pub status: Option<String>,
}

impl ListTasksQuery {
    pub fn into_filter(self) -> ApiResult<TaskFilter> {
        Ok(TaskFilter {
            project: self.project.as_deref().map(parse_project).transpose()?,
            status: self.status.as_deref().map(parse_status).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskResponse {
    pub success: bool,
    pub task: Task,
    pub agent_response: TaskAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// AGENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgentInfoResponse {
    pub agent_id: String,
    pub project: Project,
    pub personality: Personality,
    pub memory: MemorySnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub agent_id: String,
    pub user_message: String,
    pub agent_response: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContextRequest {
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContextResponse {
    pub success: bool,
    pub agent_id: String,
    pub message: String,
}

impl ChatRequest {
    pub fn message(&self) -> ApiResult<String> {
        required_text("message", &self.message)
    }
}

impl ContextRequest {
    pub fn context(&self) -> ApiResult<String> {
        required_text("context", &self.context)
    }
}

// ============================================================================
// PROJECTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectInfo {
    pub id: Project,
    pub name: String,
    pub description: String,
    /// Agent bound to the project, if one is registered.
    pub agent: Option<String>,
}

// ============================================================================
// COORDINATION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignRequest {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub project: String,
}

impl AssignRequest {
    pub fn parse(&self) -> ApiResult<(EntityId, Project)> {
        let task_id = parse_task_id(&required_text("task_id", &self.task_id)?)?;
        let project = parse_project(&required_text("project", &self.project)?)?;
        Ok((task_id, project))
    }
}

// ============================================================================
// LOGS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogsQuery {
    /// Maximum entries returned (default 50, at most 500)
    pub limit: Option<usize>,
    pub agent_id: Option<String>,
    pub event_type: Option<String>,
}

impl LogsQuery {
    pub fn into_filter(self) -> ApiResult<LogFilter> {
        let limit = self.limit.unwrap_or(DEFAULT_LOG_LIMIT);
        if limit == 0 || limit > MAX_LOG_LIMIT {
            return Err(ApiError::invalid_input(format!(
                "limit must be between 1 and {}",
                MAX_LOG_LIMIT
            )));
        }
        Ok(LogFilter {
            agent_id: self.agent_id.filter(|a| !a.is_empty()),
            event_type: self.event_type.filter(|e| !e.is_empty()),
            limit,
        })
    }
}

// ============================================================================
// BOARD
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BoardTasksQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardPushResponse {
    #[schema(value_type = String, format = Uuid)]
    pub task_id: EntityId,
    pub page_id: String,
    pub board: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardSyncResponse {
    #[schema(value_type = String, format = Uuid)]
    pub task_id: EntityId,
    pub page_id: String,
    pub board: String,
    pub status: TaskStatus,
}

// ============================================================================
// SERVICE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_create_request_validation() {
        let request = CreateTaskRequest {
            project: "ConsorcioOpt".to_string(),
            title: "  Analyze billing ".to_string(),
            priority: Some("high".to_string()),
            ..Default::default()
        };
        let task = request.into_new_task().unwrap();
        assert_eq!(task.project, Project::ConsorcioOpt);
        assert_eq!(task.title, "Analyze billing");
        assert_eq!(task.priority, TaskPriority::High);

        let err = CreateTaskRequest {
            project: "Elsewhere".to_string(),
            title: "x".to_string(),
            ..Default::default()
        }
        .into_new_task()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.details.unwrap()["valid_values"]
            .as_str()
            .unwrap()
            .contains("ConsorcioOpt"));

        let err = CreateTaskRequest {
            project: "ConsorcioOpt".to_string(),
            ..Default::default()
        }
        .into_new_task()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);
    }

    #[test]
    fn test_update_request_parses_enums() {
        let update = UpdateTaskRequest {
            status: Some("completed".to_string()),
            ..Default::default()
        }
        .into_update()
        .unwrap();
        assert_eq!(update, TaskUpdate::status(TaskStatus::Completed));

        assert!(UpdateTaskRequest::default().into_update().unwrap().is_empty());

        let err = UpdateTaskRequest {
            status: Some("done".to_string()),
            ..Default::default()
        }
        .into_update()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_logs_query_limits() {
        let filter = LogsQuery::default().into_filter().unwrap();
        assert_eq!(filter.limit, DEFAULT_LOG_LIMIT);

        let filter = LogsQuery {
            limit: Some(5),
            agent_id: Some(String::new()),
            event_type: Some("agent_chat".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.agent_id, None);
        assert_eq!(filter.event_type.as_deref(), Some("agent_chat"));

        assert!(LogsQuery {
            limit: Some(0),
            ..Default::default()
        }
        .into_filter()
        .is_err());
    }

    #[test]
    fn test_assign_request_parse() {
        let err = AssignRequest {
            task_id: "not-a-uuid".to_string(),
            project: "ConsorcioOpt".to_string(),
        }
        .parse()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        let err = AssignRequest {
            task_id: String::new(),
            project: "ConsorcioOpt".to_string(),
        }
        .parse()
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);
    }
}
