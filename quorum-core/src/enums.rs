//! Enum types for QUORUM entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PROJECTS
// ============================================================================

/// The fixed set of projects an agent can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Project {
    /// Administrative process optimisation for property consortia
    ConsorcioOpt,
    /// Social media channel for the administration business
    SocialConsorcio,
    /// Social media channel for entrepreneurs
    SocialEmprendedores,
}

impl Project {
    pub const ALL: [Project; 3] = [
        Project::ConsorcioOpt,
        Project::SocialConsorcio,
        Project::SocialEmprendedores,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Project::ConsorcioOpt => "ConsorcioOpt",
            Project::SocialConsorcio => "SocialConsorcio",
            Project::SocialEmprendedores => "SocialEmprendedores",
        }
    }

    /// Parse from database string representation. Exact match only.
    pub fn from_db_str(s: &str) -> Result<Self, ProjectParseError> {
        Project::ALL
            .into_iter()
            .find(|p| p.as_db_str() == s)
            .ok_or_else(|| ProjectParseError(s.to_string()))
    }

    /// Human-readable project name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Project::ConsorcioOpt => "Consortium Administration Optimisation",
            Project::SocialConsorcio => "Social Media Channel - Administration",
            Project::SocialEmprendedores => "Social Media Channel - Entrepreneurs",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Project::ConsorcioOpt => "Focused on optimising administrative processes",
            Project::SocialConsorcio => {
                "Social media presence for the administration services"
            }
            Project::SocialEmprendedores => {
                "Advice and mentoring for entrepreneurs on social media"
            }
        }
    }

    /// Comma-separated list of valid identifiers, for error messages.
    pub fn valid_values() -> String {
        Project::ALL.map(|p| p.as_db_str()).join(", ")
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for Project {
    type Err = ProjectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid project string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectParseError(pub String);

impl fmt::Display for ProjectParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid project: {}", self.0)
    }
}

impl std::error::Error for ProjectParseError {}

// ============================================================================
// TASK STATUS
// ============================================================================

/// Lifecycle state of a task.
///
/// `pending -> in_progress -> {completed, blocked}`, and `blocked` may go back
/// to `in_progress`. The store does not enforce this; see
/// [`TaskStatus::can_transition_to`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, TaskStatusParseError> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            _ => Err(TaskStatusParseError(s.to_string())),
        }
    }

    /// Whether moving from `self` to `next` follows the lifecycle.
    /// Staying in the same state is always allowed.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        *self == next
            || matches!(
                (*self, next),
                (Pending, InProgress)
                    | (InProgress, Completed)
                    | (InProgress, Blocked)
                    | (Blocked, InProgress)
            )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    pub fn valid_values() -> String {
        TaskStatus::ALL.map(|s| s.as_db_str()).join(", ")
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid task status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusParseError(pub String);

impl fmt::Display for TaskStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid task status: {}", self.0)
    }
}

impl std::error::Error for TaskStatusParseError {}

// ============================================================================
// TASK PRIORITY
// ============================================================================

/// Priority of a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, TaskPriorityParseError> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            _ => Err(TaskPriorityParseError(s.to_string())),
        }
    }

    pub fn valid_values() -> String {
        TaskPriority::ALL.map(|p| p.as_db_str()).join(", ")
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for TaskPriority {
    type Err = TaskPriorityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid task priority string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPriorityParseError(pub String);

impl fmt::Display for TaskPriorityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid task priority: {}", self.0)
    }
}

impl std::error::Error for TaskPriorityParseError {}

// ============================================================================
// ENTITY TYPE
// ============================================================================

/// Entity type discriminator used in storage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EntityType {
    Task,
    AgentMemory,
    SystemLog,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_db_str_roundtrip() {
        for project in Project::ALL {
            assert_eq!(Project::from_db_str(project.as_db_str()), Ok(project));
        }
    }

    #[test]
    fn test_project_is_case_sensitive() {
        assert!(Project::from_db_str("consorcioopt").is_err());
        assert!(Project::from_db_str("Unknown").is_err());
    }

    #[test]
    fn test_project_serde_uses_identifier() {
        let json = serde_json::to_string(&Project::SocialEmprendedores).unwrap();
        assert_eq!(json, "\"SocialEmprendedores\"");
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let parsed: TaskStatus = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(parsed, TaskStatus::Blocked);
    }

    #[test]
    fn test_status_from_db_str_rejects_unknown() {
        let err = TaskStatus::from_db_str("done").unwrap_err();
        assert_eq!(err.to_string(), "Invalid task status: done");
    }

    #[test]
    fn test_status_transitions() {
        use TaskStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Blocked));
        assert!(Blocked.can_transition_to(InProgress));
        assert!(Completed.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Blocked.can_transition_to(Completed));
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
        assert_eq!(TaskPriority::from_db_str("HIGH"), Ok(TaskPriority::High));
    }

    #[test]
    fn test_valid_values_lists() {
        assert_eq!(
            Project::valid_values(),
            "ConsorcioOpt, SocialConsorcio, SocialEmprendedores"
        );
        assert_eq!(
            TaskStatus::valid_values(),
            "pending, in_progress, completed, blocked"
        );
    }
}
