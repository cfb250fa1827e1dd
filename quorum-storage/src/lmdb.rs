//! LMDB-backed durable storage.
//!
//! Uses the heed crate (Rust bindings for LMDB). Three named databases hold
//! tasks, agent memories, and audit entries as JSON values:
//!
//! - `tasks`: key = task UUID bytes
//! - `agent_memory`: key = agent id (UTF-8)
//! - `system_logs`: key = entry UUID bytes
//!
//! Every trait call runs in a single transaction. Write transactions that are
//! dropped without `commit` are aborted, so an early `?` return leaves the
//! environment untouched.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use quorum_core::{
    AgentMemory, EntityId, EntityType, LogFilter, MemorySeed, QuorumError, QuorumResult,
    StorageError, SystemLogEntry, Task, TaskFilter,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    apply_memory_update, apply_task_update, credit_completion, now, select_logs, sort_tasks,
    MemoryUpdate, StorageTrait, TaskUpdate,
};

const TASKS_DB: &str = "tasks";
const MEMORY_DB: &str = "agent_memory";
const LOGS_DB: &str = "system_logs";

/// Error type for LMDB storage operations.
#[derive(Debug, thiserror::Error)]
pub enum LmdbStorageError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open a database within the environment.
    #[error("Failed to open database {name}: {reason}")]
    DbOpen { name: &'static str, reason: String },

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbStorageError> for QuorumError {
    fn from(e: LmdbStorageError) -> Self {
        QuorumError::Storage(StorageError::TransactionFailed {
            reason: e.to_string(),
        })
    }
}

fn txn_err(e: heed::Error) -> LmdbStorageError {
    LmdbStorageError::Transaction(e.to_string())
}

fn encode<T: Serialize>(entity_type: EntityType, value: &T) -> QuorumResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        StorageError::Serialization {
            entity_type,
            reason: e.to_string(),
        }
        .into()
    })
}

fn decode<T: DeserializeOwned>(entity_type: EntityType, bytes: &[u8]) -> QuorumResult<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        StorageError::Serialization {
            entity_type,
            reason: e.to_string(),
        }
        .into()
    })
}

/// Durable storage on top of an LMDB environment.
pub struct LmdbStorage {
    env: Env,
    tasks: Database<Bytes, Bytes>,
    memories: Database<Bytes, Bytes>,
    logs: Database<Bytes, Bytes>,
}

impl std::fmt::Debug for LmdbStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LmdbStorage")
            .field("path", &self.env.path())
            .finish_non_exhaustive()
    }
}

impl LmdbStorage {
    /// Open (or create) the environment at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the environment
    /// cannot be opened, or a database cannot be created.
    pub fn open<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, LmdbStorageError> {
        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment is opened once per path by this process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(3)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbStorageError::EnvOpen(e.to_string()))?;

        let mut wtxn = env.write_txn().map_err(txn_err)?;
        let mut create = |name: &'static str| -> Result<Database<Bytes, Bytes>, LmdbStorageError> {
            env.create_database(&mut wtxn, Some(name))
                .map_err(|e| LmdbStorageError::DbOpen {
                    name,
                    reason: e.to_string(),
                })
        };
        let tasks = create(TASKS_DB)?;
        let memories = create(MEMORY_DB)?;
        let logs = create(LOGS_DB)?;
        wtxn.commit().map_err(txn_err)?;

        Ok(Self {
            env,
            tasks,
            memories,
            logs,
        })
    }

    fn read_txn(&self) -> QuorumResult<RoTxn<'_>> {
        Ok(self.env.read_txn().map_err(txn_err)?)
    }

    fn write_txn(&self) -> QuorumResult<RwTxn<'_>> {
        Ok(self.env.write_txn().map_err(txn_err)?)
    }

    fn get_task(&self, txn: &RoTxn<'_>, id: EntityId) -> QuorumResult<Option<Task>> {
        match self.tasks.get(txn, id.as_bytes()).map_err(txn_err)? {
            Some(bytes) => Ok(Some(decode(EntityType::Task, bytes)?)),
            None => Ok(None),
        }
    }

    fn get_memory(&self, txn: &RoTxn<'_>, agent_id: &str) -> QuorumResult<Option<AgentMemory>> {
        match self.memories.get(txn, agent_id.as_bytes()).map_err(txn_err)? {
            Some(bytes) => Ok(Some(decode(EntityType::AgentMemory, bytes)?)),
            None => Ok(None),
        }
    }

    fn put_task(&self, txn: &mut RwTxn<'_>, task: &Task) -> QuorumResult<()> {
        let bytes = encode(EntityType::Task, task)?;
        self.tasks
            .put(txn, task.id.as_bytes(), &bytes)
            .map_err(txn_err)?;
        Ok(())
    }

    fn put_memory(&self, txn: &mut RwTxn<'_>, memory: &AgentMemory) -> QuorumResult<()> {
        let bytes = encode(EntityType::AgentMemory, memory)?;
        self.memories
            .put(txn, memory.agent_id.as_bytes(), &bytes)
            .map_err(txn_err)?;
        Ok(())
    }

    fn commit(txn: RwTxn<'_>) -> QuorumResult<()> {
        Ok(txn.commit().map_err(txn_err)?)
    }
}

impl StorageTrait for LmdbStorage {
    // === Task Operations ===

    fn task_insert(&self, task: &Task) -> QuorumResult<()> {
        let mut wtxn = self.write_txn()?;
        if self.get_task(&wtxn, task.id)?.is_some() {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Task,
                reason: "already exists".to_string(),
            }
            .into());
        }
        self.put_task(&mut wtxn, task)?;
        Self::commit(wtxn)
    }

    fn task_get(&self, id: EntityId) -> QuorumResult<Option<Task>> {
        let rtxn = self.read_txn()?;
        self.get_task(&rtxn, id)
    }

    fn task_list(&self, filter: &TaskFilter) -> QuorumResult<Vec<Task>> {
        let rtxn = self.read_txn()?;
        let mut listed = Vec::new();
        for item in self.tasks.iter(&rtxn).map_err(txn_err)? {
            let (_, bytes) = item.map_err(txn_err)?;
            let task: Task = decode(EntityType::Task, bytes)?;
            if filter.matches(task.project, task.status) {
                listed.push(task);
            }
        }
        sort_tasks(&mut listed);
        Ok(listed)
    }

    fn task_update(&self, id: EntityId, update: TaskUpdate) -> QuorumResult<Task> {
        let mut wtxn = self.write_txn()?;
        let mut task = self
            .get_task(&wtxn, id)?
            .ok_or_else(|| StorageError::NotFound {
                entity_type: EntityType::Task,
                id: id.to_string(),
            })?;

        let now = now();
        if let Some(agent_id) = apply_task_update(&mut task, update, now) {
            match self.get_memory(&wtxn, &agent_id)? {
                Some(mut memory) => {
                    credit_completion(&mut memory, now);
                    self.put_memory(&mut wtxn, &memory)?;
                }
                None => tracing::warn!(agent_id = %agent_id, task_id = %id, "Completed task credited to unknown agent"),
            }
        }
        self.put_task(&mut wtxn, &task)?;
        Self::commit(wtxn)?;
        Ok(task)
    }

    fn task_delete(&self, id: EntityId) -> QuorumResult<()> {
        let mut wtxn = self.write_txn()?;
        let deleted = self.tasks.delete(&mut wtxn, id.as_bytes()).map_err(txn_err)?;
        if !deleted {
            return Err(StorageError::NotFound {
                entity_type: EntityType::Task,
                id: id.to_string(),
            }
            .into());
        }
        Self::commit(wtxn)
    }

    // === Agent Memory Operations ===

    fn memory_get_or_create(&self, seed: MemorySeed) -> QuorumResult<AgentMemory> {
        let mut wtxn = self.write_txn()?;
        if let Some(existing) = self.get_memory(&wtxn, &seed.agent_id)? {
            return Ok(existing);
        }
        let memory = seed.into_memory();
        self.put_memory(&mut wtxn, &memory)?;
        Self::commit(wtxn)?;
        Ok(memory)
    }

    fn memory_get(&self, agent_id: &str) -> QuorumResult<Option<AgentMemory>> {
        let rtxn = self.read_txn()?;
        self.get_memory(&rtxn, agent_id)
    }

    fn memory_update(&self, agent_id: &str, update: MemoryUpdate) -> QuorumResult<AgentMemory> {
        let mut wtxn = self.write_txn()?;
        let mut memory = self
            .get_memory(&wtxn, agent_id)?
            .ok_or_else(|| StorageError::NotFound {
                entity_type: EntityType::AgentMemory,
                id: agent_id.to_string(),
            })?;
        apply_memory_update(&mut memory, update, now());
        self.put_memory(&mut wtxn, &memory)?;
        Self::commit(wtxn)?;
        Ok(memory)
    }

    // === Audit Log Operations ===

    fn log_insert(&self, entry: &SystemLogEntry) -> QuorumResult<()> {
        let bytes = encode(EntityType::SystemLog, entry)?;
        let mut wtxn = self.write_txn()?;
        self.logs
            .put(&mut wtxn, entry.id.as_bytes(), &bytes)
            .map_err(txn_err)?;
        Self::commit(wtxn)
    }

    fn log_list(&self, filter: &LogFilter) -> QuorumResult<Vec<SystemLogEntry>> {
        let rtxn = self.read_txn()?;
        let mut entries = Vec::new();
        for item in self.logs.iter(&rtxn).map_err(txn_err)? {
            let (_, bytes) = item.map_err(txn_err)?;
            entries.push(decode(EntityType::SystemLog, bytes)?);
        }
        Ok(select_logs(entries, filter))
    }

    fn ping(&self) -> QuorumResult<()> {
        let _rtxn = self.read_txn()?;
        Ok(())
    }
}
