//! Entity structures

use crate::{new_entity_id, EntityId, Project, TaskPriority, TaskStatus, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form JSON metadata attached to tasks and memories.
pub type Metadata = BTreeMap<String, Value>;

/// Number of history entries any read-facing memory view exposes.
pub const MEMORY_VIEW_LIMIT: usize = 10;

// ============================================================================
// TASK
// ============================================================================

/// A unit of work bound to one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Task {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Uuid))]
    pub id: EntityId,
    pub project: Project,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_agent: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub updated_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metadata: Metadata,
}

/// Input for creating a task. Everything not listed here is defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub project: Project,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewTask {
    pub fn new(project: Project, title: impl Into<String>) -> Self {
        Self {
            project,
            title: title.into(),
            description: String::new(),
            priority: TaskPriority::default(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Materialize into a pending task with a fresh id.
    pub fn into_task(self) -> Task {
        let now = Utc::now();
        Task {
            id: new_entity_id(),
            project: self.project,
            title: self.title,
            description: self.description,
            status: TaskStatus::Pending,
            priority: self.priority,
            assigned_agent: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            notes: None,
            subtasks: Vec::new(),
            metadata: self.metadata,
        }
    }
}

// ============================================================================
// AGENT MEMORY
// ============================================================================

/// Immutable personality descriptor of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Personality {
    pub name: String,
    pub role: String,
    pub tone: String,
    pub focus: String,
    pub specialties: Vec<String>,
    pub communication_style: String,
}

/// One entry of an agent's conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationEntry {
    /// Result of processing a task.
    Task {
        #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
        timestamp: Timestamp,
        #[cfg_attr(feature = "openapi", schema(value_type = String, format = Uuid))]
        task_id: EntityId,
        #[cfg_attr(feature = "openapi", schema(value_type = Object))]
        response: Value,
    },
    /// A free-form chat exchange.
    Chat {
        #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
        timestamp: Timestamp,
        user_message: String,
        agent_response: String,
    },
}

impl ConversationEntry {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            ConversationEntry::Task { timestamp, .. } => *timestamp,
            ConversationEntry::Chat { timestamp, .. } => *timestamp,
        }
    }
}

/// A decision the agent took on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DecisionEntry {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub timestamp: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Uuid))]
    pub task_id: EntityId,
    pub suggested_status: Option<TaskStatus>,
    pub summary: String,
}

/// Persisted running memory of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AgentMemory {
    pub agent_id: String,
    pub project: Project,
    pub context: Option<String>,
    pub personality_traits: Personality,
    #[serde(default)]
    pub conversation_history: Vec<ConversationEntry>,
    #[serde(default)]
    pub decisions_made: Vec<DecisionEntry>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub last_active: Timestamp,
    pub total_tasks_completed: u64,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metadata: Metadata,
}

/// Values needed to create a memory record on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySeed {
    pub agent_id: String,
    pub project: Project,
    pub personality: Personality,
}

impl MemorySeed {
    pub fn into_memory(self) -> AgentMemory {
        AgentMemory {
            agent_id: self.agent_id,
            project: self.project,
            context: None,
            personality_traits: self.personality,
            conversation_history: Vec::new(),
            decisions_made: Vec::new(),
            last_active: Utc::now(),
            total_tasks_completed: 0,
            metadata: Metadata::new(),
        }
    }
}

impl AgentMemory {
    /// The last `n` decisions, oldest first.
    pub fn recent_decisions(&self, n: usize) -> &[DecisionEntry] {
        tail(&self.decisions_made, n)
    }

    /// Read-facing view with histories truncated to [`MEMORY_VIEW_LIMIT`].
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            agent_id: self.agent_id.clone(),
            project: self.project,
            context: self.context.clone(),
            personality_traits: self.personality_traits.clone(),
            conversation_history: tail(&self.conversation_history, MEMORY_VIEW_LIMIT).to_vec(),
            decisions_made: tail(&self.decisions_made, MEMORY_VIEW_LIMIT).to_vec(),
            total_conversations: self.conversation_history.len(),
            total_decisions: self.decisions_made.len(),
            last_active: self.last_active,
            total_tasks_completed: self.total_tasks_completed,
        }
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// Truncated view of an [`AgentMemory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MemorySnapshot {
    pub agent_id: String,
    pub project: Project,
    pub context: Option<String>,
    pub personality_traits: Personality,
    pub conversation_history: Vec<ConversationEntry>,
    pub decisions_made: Vec<DecisionEntry>,
    pub total_conversations: usize,
    pub total_decisions: usize,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub last_active: Timestamp,
    pub total_tasks_completed: u64,
}

// ============================================================================
// SYSTEM LOG
// ============================================================================

/// Immutable audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SystemLogEntry {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Uuid))]
    pub id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub timestamp: Timestamp,
    pub event_type: String,
    pub agent_id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = Uuid))]
    pub task_id: Option<EntityId>,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub metadata: Value,
}

impl SystemLogEntry {
    pub fn new(
        event_type: impl Into<String>,
        agent_id: impl Into<String>,
        task_id: Option<EntityId>,
        description: impl Into<String>,
        metadata: Value,
    ) -> Self {
        Self {
            id: new_entity_id(),
            timestamp: Utc::now(),
            event_type: event_type.into(),
            agent_id: agent_id.into(),
            task_id,
            description: description.into(),
            metadata,
        }
    }
}
