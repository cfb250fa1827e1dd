//! OpenAPI Specification for QUORUM API
//!
//! Generated by utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthResponse, HealthStatus};
use crate::routes::{agents, board, coordinate, health, logs, projects, tasks};
use crate::types::*;

use quorum_agents::{AgentStatusReport, Assignment, ProjectStatus, SystemReport, TaskAnalysis};
use quorum_board::BoardTask;
use quorum_core::{
    ConversationEntry, DecisionEntry, EntityType, MemorySnapshot, Personality, Project,
    SystemLogEntry, Task, TaskPriority, TaskStatus,
};

/// OpenAPI document for the QUORUM API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QUORUM API",
        version = "0.1.0",
        description = "Multi-agent task coordinator: projects, personified agents, and task routing",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local Development")
    ),
    tags(
        (name = "Service", description = "Banner and health check"),
        (name = "Tasks", description = "Task CRUD with auto-assignment"),
        (name = "Agents", description = "Agent status, chat, memory and context"),
        (name = "Projects", description = "Project catalogue and per-project views"),
        (name = "Coordination", description = "Manual assignment and system report"),
        (name = "Audit", description = "System log"),
        (name = "Board", description = "External task board mirror"),
    ),
    paths(
        crate::routes::root,
        health::health,
        tasks::create_task,
        tasks::list_tasks,
        tasks::get_task,
        tasks::update_task,
        tasks::delete_task,
        agents::list_agents,
        agents::get_agent,
        agents::chat,
        agents::get_memory,
        agents::update_context,
        projects::list_projects,
        projects::project_tasks,
        projects::project_status,
        coordinate::assign,
        coordinate::report,
        logs::list_logs,
        board::push_task,
        board::sync_status,
        board::list_tasks,
    ),
    components(
        schemas(
            ApiError,
            ErrorCode,
            HealthResponse,
            HealthStatus,
            ComponentHealth,
            ServiceInfo,
            // Tasks
            Task,
            TaskStatus,
            TaskPriority,
            Project,
            EntityType,
            CreateTaskRequest,
            CreateTaskResponse,
            UpdateTaskRequest,
            DeleteResponse,
            // Agents
            Personality,
            MemorySnapshot,
            ConversationEntry,
            DecisionEntry,
            AgentInfoResponse,
            AgentStatusReport,
            ChatRequest,
            ChatResponse,
            ContextRequest,
            ContextResponse,
            TaskAnalysis,
            // Projects and coordination
            ProjectInfo,
            ProjectStatus,
            AssignRequest,
            Assignment,
            SystemReport,
            SystemLogEntry,
            // Board
            BoardTask,
            BoardPushResponse,
            BoardSyncResponse,
        )
    )
)]
pub struct ApiDoc;
