//! QUORUM Storage - Storage Trait and Backends
//!
//! Defines the persistence boundary for tasks, agent memories, and audit
//! entries, plus two backends: [`InMemoryStorage`] and the durable
//! LMDB-backed [`LmdbStorage`].

pub mod lmdb;
pub mod memory;

pub use lmdb::{LmdbStorage, LmdbStorageError};
pub use memory::InMemoryStorage;

use chrono::Utc;
use quorum_core::{
    AgentMemory, ConversationEntry, DecisionEntry, EntityId, LogFilter, MemorySeed, Metadata,
    Project, QuorumResult, StorageBackend, StorageConfig, SystemLogEntry, Task, TaskFilter,
    TaskPriority, TaskStatus, Timestamp,
};
use std::sync::Arc;

// ============================================================================
// UPDATE TYPES
// ============================================================================

/// Partial update payload for tasks. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub project: Option<Project>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_agent: Option<String>,
    pub notes: Option<String>,
    pub subtasks: Option<Vec<String>>,
    pub metadata: Option<Metadata>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self == &TaskUpdate::default()
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Partial update payload for agent memories.
///
/// `context` and `metadata` overwrite; the two history vectors are appended
/// to what is already stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryUpdate {
    pub context: Option<String>,
    pub append_conversation: Vec<ConversationEntry>,
    pub append_decisions: Vec<DecisionEntry>,
    pub metadata: Option<Metadata>,
}

impl MemoryUpdate {
    pub fn context(context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            ..Self::default()
        }
    }

    pub fn conversation(entry: ConversationEntry) -> Self {
        Self {
            append_conversation: vec![entry],
            ..Self::default()
        }
    }
}

/// Apply a task update in place. Returns the agent to credit when the
/// update moves the task into `completed` for the first time.
///
/// `completed_at` is set once; a reopened task that is completed again
/// keeps its original timestamp and credits nobody.
pub(crate) fn apply_task_update(
    task: &mut Task,
    update: TaskUpdate,
    now: Timestamp,
) -> Option<String> {
    if let Some(project) = update.project {
        task.project = project;
    }
    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(description) = update.description {
        task.description = description;
    }
    if let Some(priority) = update.priority {
        task.priority = priority;
    }
    if let Some(agent) = update.assigned_agent {
        task.assigned_agent = Some(agent);
    }
    if let Some(notes) = update.notes {
        task.notes = Some(notes);
    }
    if let Some(subtasks) = update.subtasks {
        task.subtasks = subtasks;
    }
    if let Some(metadata) = update.metadata {
        task.metadata = metadata;
    }
    if let Some(status) = update.status {
        task.status = status;
    }
    task.updated_at = now;

    if task.status == TaskStatus::Completed && task.completed_at.is_none() {
        task.completed_at = Some(now);
        return task.assigned_agent.clone();
    }
    None
}

pub(crate) fn apply_memory_update(memory: &mut AgentMemory, update: MemoryUpdate, now: Timestamp) {
    if let Some(context) = update.context {
        memory.context = Some(context);
    }
    if let Some(metadata) = update.metadata {
        memory.metadata = metadata;
    }
    memory.conversation_history.extend(update.append_conversation);
    memory.decisions_made.extend(update.append_decisions);
    memory.last_active = now;
}

pub(crate) fn credit_completion(memory: &mut AgentMemory, now: Timestamp) {
    memory.total_tasks_completed += 1;
    memory.last_active = now;
}

/// Newest first, ties broken by the time-ordered id.
pub(crate) fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

pub(crate) fn select_logs(mut logs: Vec<SystemLogEntry>, filter: &LogFilter) -> Vec<SystemLogEntry> {
    logs.retain(|l| filter.matches(&l.agent_id, &l.event_type));
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    logs.truncate(filter.limit);
    logs
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

/// Storage trait for QUORUM records.
///
/// Every method is one transaction. Reads return fully materialized
/// snapshots; updates and deletes of missing records fail with
/// `StorageError::NotFound`.
pub trait StorageTrait: Send + Sync {
    // === Task Operations ===

    /// Insert a new task.
    fn task_insert(&self, task: &Task) -> QuorumResult<()>;

    /// Get a task by ID.
    fn task_get(&self, id: EntityId) -> QuorumResult<Option<Task>>;

    /// List tasks matching the filter, newest first.
    fn task_list(&self, filter: &TaskFilter) -> QuorumResult<Vec<Task>>;

    /// Apply a partial update and return the updated task.
    ///
    /// A transition into `completed` also increments the assigned agent's
    /// `total_tasks_completed` in the same transaction.
    fn task_update(&self, id: EntityId, update: TaskUpdate) -> QuorumResult<Task>;

    /// Delete a task.
    fn task_delete(&self, id: EntityId) -> QuorumResult<()>;

    // === Agent Memory Operations ===

    /// Return the memory for `seed.agent_id`, creating it if absent.
    fn memory_get_or_create(&self, seed: MemorySeed) -> QuorumResult<AgentMemory>;

    /// Get the memory of an agent.
    fn memory_get(&self, agent_id: &str) -> QuorumResult<Option<AgentMemory>>;

    /// Apply a partial update and return the updated memory.
    fn memory_update(&self, agent_id: &str, update: MemoryUpdate) -> QuorumResult<AgentMemory>;

    // === Audit Log Operations ===

    /// Append an audit entry.
    fn log_insert(&self, entry: &SystemLogEntry) -> QuorumResult<()>;

    /// List audit entries matching the filter, newest first, at most `filter.limit`.
    fn log_list(&self, filter: &LogFilter) -> QuorumResult<Vec<SystemLogEntry>>;

    // === Health ===

    /// Cheap connectivity check.
    fn ping(&self) -> QuorumResult<()>;
}

/// Open the backend selected by the configuration.
pub fn open_storage(config: &StorageConfig) -> QuorumResult<Arc<dyn StorageTrait>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Arc::new(InMemoryStorage::new()))
        }
        StorageBackend::Lmdb => {
            tracing::info!(path = %config.path.display(), max_size_mb = config.max_size_mb, "Opening LMDB storage");
            Ok(Arc::new(LmdbStorage::open(&config.path, config.max_size_mb)?))
        }
    }
}

pub(crate) fn now() -> Timestamp {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::NewTask;

    #[test]
    fn test_empty_update_detected() {
        assert!(TaskUpdate::default().is_empty());
        assert!(!TaskUpdate::status(TaskStatus::Blocked).is_empty());
    }

    #[test]
    fn test_apply_sets_completed_at_once() {
        let mut task = NewTask::new(Project::ConsorcioOpt, "t").into_task();
        task.assigned_agent = Some("OptimizadorConsorcio".to_string());

        let first = Utc::now();
        let credited = apply_task_update(&mut task, TaskUpdate::status(TaskStatus::Completed), first);
        assert_eq!(credited.as_deref(), Some("OptimizadorConsorcio"));
        assert_eq!(task.completed_at, Some(first));

        let later = first + chrono::Duration::seconds(5);
        let credited = apply_task_update(&mut task, TaskUpdate::status(TaskStatus::Completed), later);
        assert!(credited.is_none());
        assert_eq!(task.completed_at, Some(first));
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn test_reopened_task_is_not_credited_twice() {
        let mut task = NewTask::new(Project::ConsorcioOpt, "t").into_task();
        task.assigned_agent = Some("OptimizadorConsorcio".to_string());

        let first = Utc::now();
        assert!(apply_task_update(&mut task, TaskUpdate::status(TaskStatus::Completed), first).is_some());

        let reopened = first + chrono::Duration::seconds(5);
        assert!(apply_task_update(&mut task, TaskUpdate::status(TaskStatus::InProgress), reopened).is_none());
        assert_eq!(task.completed_at, Some(first));

        let again = first + chrono::Duration::seconds(10);
        let credited = apply_task_update(&mut task, TaskUpdate::status(TaskStatus::Completed), again);
        assert!(credited.is_none());
        assert_eq!(task.completed_at, Some(first));
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_unassigned_completion_credits_nobody() {
        let mut task = NewTask::new(Project::ConsorcioOpt, "t").into_task();
        let credited = apply_task_update(&mut task, TaskUpdate::status(TaskStatus::Completed), Utc::now());
        assert!(credited.is_none());
        assert!(task.completed_at.is_some());
    }

    #[test]
    fn test_select_logs_orders_and_limits() {
        let base = Utc::now();
        let logs: Vec<SystemLogEntry> = (0..5)
            .map(|i| {
                let mut entry = SystemLogEntry::new(
                    "task_processed",
                    if i % 2 == 0 { "a" } else { "b" },
                    None,
                    format!("entry {i}"),
                    serde_json::Value::Null,
                );
                entry.timestamp = base + chrono::Duration::seconds(i);
                entry
            })
            .collect();

        let filter = LogFilter {
            agent_id: Some("a".to_string()),
            limit: 2,
            ..LogFilter::default()
        };
        let selected = select_logs(logs, &filter);
        let descriptions: Vec<_> = selected.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(descriptions, vec!["entry 4", "entry 2"]);
    }
}
