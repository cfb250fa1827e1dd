//! In-memory storage backend.
//!
//! Tables are independent `RwLock`-guarded maps. Writes that touch both
//! tasks and memories take the task lock first, then the memory lock.

use crate::{
    apply_memory_update, apply_task_update, credit_completion, now, select_logs, sort_tasks,
    MemoryUpdate, StorageTrait, TaskUpdate,
};
use quorum_core::{
    AgentMemory, EntityId, EntityType, LogFilter, MemorySeed, QuorumResult, StorageError,
    SystemLogEntry, Task, TaskFilter,
};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

fn poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::LockPoisoned
}

/// Storage backed by process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    tasks: RwLock<HashMap<EntityId, Task>>,
    memories: RwLock<HashMap<String, AgentMemory>>,
    logs: RwLock<Vec<SystemLogEntry>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageTrait for InMemoryStorage {
    // === Task Operations ===

    fn task_insert(&self, task: &Task) -> QuorumResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        if tasks.contains_key(&task.id) {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Task,
                reason: "already exists".to_string(),
            }
            .into());
        }
        tasks.insert(task.id, task.clone());
        Ok(())
    }

    fn task_get(&self, id: EntityId) -> QuorumResult<Option<Task>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.get(&id).cloned())
    }

    fn task_list(&self, filter: &TaskFilter) -> QuorumResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        let mut listed: Vec<Task> = tasks
            .values()
            .filter(|t| filter.matches(t.project, t.status))
            .cloned()
            .collect();
        sort_tasks(&mut listed);
        Ok(listed)
    }

    fn task_update(&self, id: EntityId, update: TaskUpdate) -> QuorumResult<Task> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        let task = tasks.get_mut(&id).ok_or(StorageError::NotFound {
            entity_type: EntityType::Task,
            id: id.to_string(),
        })?;

        let now = now();
        // Apply to a copy so a failure below leaves the stored task unchanged.
        let mut updated = task.clone();
        if let Some(agent_id) = apply_task_update(&mut updated, update, now) {
            let mut memories = self.memories.write().map_err(poisoned)?;
            match memories.get_mut(&agent_id) {
                Some(memory) => credit_completion(memory, now),
                None => tracing::warn!(agent_id = %agent_id, task_id = %id, "Completed task credited to unknown agent"),
            }
        }
        *task = updated.clone();
        Ok(updated)
    }

    fn task_delete(&self, id: EntityId) -> QuorumResult<()> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| {
                StorageError::NotFound {
                    entity_type: EntityType::Task,
                    id: id.to_string(),
                }
                .into()
            })
    }

    // === Agent Memory Operations ===

    fn memory_get_or_create(&self, seed: MemorySeed) -> QuorumResult<AgentMemory> {
        let mut memories = self.memories.write().map_err(poisoned)?;
        let memory = memories
            .entry(seed.agent_id.clone())
            .or_insert_with(|| seed.into_memory());
        Ok(memory.clone())
    }

    fn memory_get(&self, agent_id: &str) -> QuorumResult<Option<AgentMemory>> {
        let memories = self.memories.read().map_err(poisoned)?;
        Ok(memories.get(agent_id).cloned())
    }

    fn memory_update(&self, agent_id: &str, update: MemoryUpdate) -> QuorumResult<AgentMemory> {
        let mut memories = self.memories.write().map_err(poisoned)?;
        let memory = memories
            .get_mut(agent_id)
            .ok_or_else(|| StorageError::NotFound {
                entity_type: EntityType::AgentMemory,
                id: agent_id.to_string(),
            })?;
        apply_memory_update(memory, update, now());
        Ok(memory.clone())
    }

    // === Audit Log Operations ===

    fn log_insert(&self, entry: &SystemLogEntry) -> QuorumResult<()> {
        let mut logs = self.logs.write().map_err(poisoned)?;
        logs.push(entry.clone());
        Ok(())
    }

    fn log_list(&self, filter: &LogFilter) -> QuorumResult<Vec<SystemLogEntry>> {
        let logs = self.logs.read().map_err(poisoned)?;
        Ok(select_logs(logs.clone(), filter))
    }

    fn ping(&self) -> QuorumResult<()> {
        let _tasks = self.tasks.read().map_err(poisoned)?;
        Ok(())
    }
}
