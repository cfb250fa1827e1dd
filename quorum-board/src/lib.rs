//! QUORUM Board - External Task Board Integration
//!
//! Mirrors tasks onto a project-tracking board. [`NotionBoard`] talks to a
//! Notion database; [`InMemoryBoard`] backs tests and local development.

pub mod memory;
pub mod notion;

pub use memory::InMemoryBoard;
pub use notion::NotionBoard;

use async_trait::async_trait;
use quorum_core::{BoardConfig, QuorumResult, Task, TaskPriority, TaskStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// BOARD TYPES
// ============================================================================

/// A task as seen on the board.
///
/// `status` and `priority` are `None` when the board holds a label QUORUM
/// does not know; the raw label is kept alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BoardTask {
    pub page_id: String,
    pub title: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub status_label: Option<String>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
}

/// Board label for a task status.
pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Not Started",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::Completed => "Done",
        TaskStatus::Blocked => "Blocked",
    }
}

pub fn status_from_label(label: &str) -> Option<TaskStatus> {
    TaskStatus::ALL
        .into_iter()
        .find(|s| status_label(*s).eq_ignore_ascii_case(label.trim()))
}

/// Board label for a priority (title case).
pub fn priority_label(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "Low",
        TaskPriority::Medium => "Medium",
        TaskPriority::High => "High",
        TaskPriority::Urgent => "Urgent",
    }
}

pub fn priority_from_label(label: &str) -> Option<TaskPriority> {
    TaskPriority::from_db_str(&label.trim().to_ascii_lowercase()).ok()
}

// ============================================================================
// BOARD TRAIT
// ============================================================================

/// A project-tracking board that tasks can be mirrored onto.
#[async_trait]
pub trait TaskBoard: Send + Sync {
    /// Create a board entry for `task`, returning its page id.
    async fn push_task(&self, task: &Task) -> QuorumResult<String>;

    async fn update_status(&self, page_id: &str, status: TaskStatus) -> QuorumResult<()>;

    /// Entries on the board, optionally only those with `status`.
    async fn list_tasks(&self, status: Option<TaskStatus>) -> QuorumResult<Vec<BoardTask>>;

    async fn add_comment(&self, page_id: &str, text: &str) -> QuorumResult<()>;

    /// Backend name used in logs (e.g., "notion").
    fn name(&self) -> &str;
}

/// Build the configured board, if any.
pub fn build_board(config: Option<&BoardConfig>) -> Option<Arc<dyn TaskBoard>> {
    let config = config?;
    let board = NotionBoard::new(config);
    tracing::info!(database_id = %config.database_id, "Notion board configured");
    Some(Arc::new(board))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_roundtrip() {
        for status in TaskStatus::ALL {
            assert_eq!(status_from_label(status_label(status)), Some(status));
        }
        assert_eq!(status_from_label("done"), Some(TaskStatus::Completed));
        assert_eq!(status_from_label("Archived"), None);
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(priority_label(TaskPriority::Urgent), "Urgent");
        assert_eq!(priority_from_label("High"), Some(TaskPriority::High));
        assert_eq!(priority_from_label("Critical"), None);
    }

    #[test]
    fn test_build_board_requires_config() {
        assert!(build_board(None).is_none());
        let config = BoardConfig {
            api_key: "secret".to_string(),
            database_id: "db".to_string(),
            base_url: None,
        };
        assert_eq!(build_board(Some(&config)).map(|b| b.name().to_string()).as_deref(), Some("notion"));
    }
}
