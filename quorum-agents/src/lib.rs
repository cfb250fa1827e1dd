//! QUORUM Agents - Personified Agents and Task Coordination
//!
//! Provides:
//! - [`Agent`]: one personality bound to one project, with persisted memory
//! - [`TaskAnalysis`]: the structured result an agent produces for a task
//! - [`Coordinator`]: the fixed agent registry that routes tasks to agents
//! - [`TaskLocks`]: per-task mutual exclusion for assignments

mod agent;
mod analysis;
mod coordinator;
mod locks;
pub mod prompt;
mod roster;

pub use agent::Agent;
pub use analysis::{TaskAnalysis, FALLBACK_ANALYSIS};
pub use coordinator::{
    AgentStatusReport, Assignment, Coordinator, ProjectStatus, SystemReport, COORDINATOR_ID,
};
pub use locks::{TaskLockGuard, TaskLocks};
pub use roster::{default_roster, AgentProfile};

use quorum_core::SystemLogEntry;
use quorum_storage::StorageTrait;

/// Audit event types written to the system log.
pub mod events {
    pub const TASK_CREATED: &str = "task_created";
    pub const TASK_UPDATED: &str = "task_updated";
    pub const TASK_DELETED: &str = "task_deleted";
    pub const TASK_ASSIGNED: &str = "task_assigned";
    pub const TASK_PROCESSED: &str = "task_processed";
    pub const TASK_PROCESSING_FAILED: &str = "task_processing_failed";
    pub const AGENT_CHAT: &str = "agent_chat";
    pub const CONTEXT_UPDATED: &str = "context_updated";
    pub const BOARD_PUSHED: &str = "board_pushed";
    pub const BOARD_SYNCED: &str = "board_synced";
}

/// Write an audit entry. The operation being audited has already happened,
/// so a failed write is only logged.
pub fn record_event(storage: &dyn StorageTrait, entry: SystemLogEntry) {
    if let Err(e) = storage.log_insert(&entry) {
        tracing::warn!(
            event_type = %entry.event_type,
            agent_id = %entry.agent_id,
            error = %e,
            "Failed to write audit entry"
        );
    }
}
