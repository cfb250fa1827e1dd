//! Query filters for task and audit listings

use crate::{Project, TaskStatus};
use serde::{Deserialize, Serialize};

/// Default number of audit entries returned by a log listing.
pub const DEFAULT_LOG_LIMIT: usize = 50;

/// Optional project and status filters for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub project: Option<Project>,
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    pub fn project(project: Project) -> Self {
        Self {
            project: Some(project),
            status: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, project: Project, status: TaskStatus) -> bool {
        self.project.is_none_or(|p| p == project) && self.status.is_none_or(|s| s == status)
    }
}

/// Filters for audit log listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    pub agent_id: Option<String>,
    pub event_type: Option<String>,
    pub limit: usize,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            agent_id: None,
            event_type: None,
            limit: DEFAULT_LOG_LIMIT,
        }
    }
}

impl LogFilter {
    pub fn matches(&self, agent_id: &str, event_type: &str) -> bool {
        self.agent_id.as_deref().is_none_or(|a| a == agent_id)
            && self.event_type.as_deref().is_none_or(|e| e == event_type)
    }
}
