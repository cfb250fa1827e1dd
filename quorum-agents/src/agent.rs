//! A single personified agent bound to one project.

use crate::analysis::TaskAnalysis;
use crate::events;
use crate::prompt::{self, PROMPT_DECISION_LIMIT};
use crate::roster::AgentProfile;
use crate::record_event;
use chrono::Utc;
use quorum_core::{
    AgentMemory, ConversationEntry, DecisionEntry, EntityType, MemorySnapshot, Personality,
    Project, QuorumResult, StorageError, SystemLogEntry, Task,
};
use quorum_llm::CompletionClient;
use quorum_storage::{MemoryUpdate, StorageTrait};
use serde_json::json;
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

/// An agent with a fixed personality, its persisted memory, and a handle to
/// the completion client.
///
/// The in-process memory copy is refreshed after every write this agent
/// makes, so prompts always see the latest context and decisions.
pub struct Agent {
    profile: AgentProfile,
    storage: Arc<dyn StorageTrait>,
    client: Arc<dyn CompletionClient>,
    memory: RwLock<AgentMemory>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("agent_id", &self.profile.agent_id)
            .field("project", &self.profile.project)
            .field("provider", &self.client.provider())
            .finish()
    }
}

impl Agent {
    /// Create the agent, loading or creating its memory record.
    pub fn new(
        profile: AgentProfile,
        storage: Arc<dyn StorageTrait>,
        client: Arc<dyn CompletionClient>,
    ) -> QuorumResult<Self> {
        let memory = storage.memory_get_or_create(profile.seed())?;
        debug!(
            agent_id = %profile.agent_id,
            history = memory.conversation_history.len(),
            "Agent memory loaded"
        );
        Ok(Self {
            profile,
            storage,
            client,
            memory: RwLock::new(memory),
        })
    }

    pub fn id(&self) -> &str {
        &self.profile.agent_id
    }

    pub fn project(&self) -> Project {
        self.profile.project
    }

    pub fn personality(&self) -> &Personality {
        &self.profile.personality
    }

    fn cached(&self) -> RwLockReadGuard<'_, AgentMemory> {
        self.memory.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Keeps the newest record; a write that lost a race with a later one
    /// must not restore older state.
    fn replace_cache(&self, memory: AgentMemory) {
        let mut cached = self.memory.write().unwrap_or_else(|e| e.into_inner());
        if memory.last_active >= cached.last_active {
            *cached = memory;
        }
    }

    /// System prompt from the personality, current context, and the last
    /// few decisions.
    pub fn build_prompt(&self) -> String {
        let memory = self.cached();
        prompt::system_prompt(
            self.id(),
            self.project(),
            self.personality(),
            memory.context.as_deref(),
            memory.recent_decisions(PROMPT_DECISION_LIMIT),
        )
    }

    /// Ask the model for a structured analysis of `task`.
    ///
    /// Model and parse failures are absorbed into [`TaskAnalysis::fallback`].
    /// Only a failure to persist the agent's memory is returned as an error.
    pub async fn process(&self, task: &Task) -> QuorumResult<TaskAnalysis> {
        let system = self.build_prompt();
        let user = prompt::task_message(self.id(), task);
        debug!(
            agent_id = %self.id(),
            task_id = %task.id,
            system_len = system.len(),
            user_len = user.len(),
            "Processing task"
        );

        let analysis = match self.client.complete(&system, &user).await {
            Ok(text) => TaskAnalysis::parse(&text).unwrap_or_else(|reason| {
                warn!(agent_id = %self.id(), task_id = %task.id, %reason, "Unusable analysis");
                TaskAnalysis::fallback(reason)
            }),
            Err(e) => {
                warn!(agent_id = %self.id(), task_id = %task.id, error = %e, "Completion failed");
                TaskAnalysis::fallback(e.to_string())
            }
        };

        let now = Utc::now();
        let response = serde_json::to_value(&analysis).map_err(|e| StorageError::Serialization {
            entity_type: EntityType::AgentMemory,
            reason: e.to_string(),
        })?;
        let mut update = MemoryUpdate::conversation(ConversationEntry::Task {
            timestamp: now,
            task_id: task.id,
            response,
        });
        if !analysis.is_fallback() {
            update.append_decisions.push(DecisionEntry {
                timestamp: now,
                task_id: task.id,
                suggested_status: analysis.suggested_status,
                summary: analysis.summary(),
            });
        }
        let memory = self.storage.memory_update(self.id(), update)?;
        self.replace_cache(memory);

        let (event, description) = if analysis.is_fallback() {
            (events::TASK_PROCESSING_FAILED, format!("Failed to process task: {}", task.title))
        } else {
            (events::TASK_PROCESSED, format!("Processed task: {}", task.title))
        };
        record_event(
            self.storage.as_ref(),
            SystemLogEntry::new(
                event,
                self.id(),
                Some(task.id),
                description,
                json!({ "suggested_status": analysis.effective_status() }),
            ),
        );
        info!(
            agent_id = %self.id(),
            task_id = %task.id,
            fallback = analysis.is_fallback(),
            "Task processed"
        );
        Ok(analysis)
    }

    /// Free-form conversation. A model failure is returned as an error
    /// string in place of the reply.
    pub async fn chat(&self, message: &str) -> QuorumResult<String> {
        let system = self.build_prompt();
        let reply = match self.client.complete(&system, message).await {
            Ok(text) => text,
            Err(e) => {
                warn!(agent_id = %self.id(), error = %e, "Chat completion failed");
                format!("Error during conversation: {e}")
            }
        };

        let memory = self.storage.memory_update(
            self.id(),
            MemoryUpdate::conversation(ConversationEntry::Chat {
                timestamp: Utc::now(),
                user_message: message.to_string(),
                agent_response: reply.clone(),
            }),
        )?;
        self.replace_cache(memory);

        record_event(
            self.storage.as_ref(),
            SystemLogEntry::new(
                events::AGENT_CHAT,
                self.id(),
                None,
                "Chat message",
                json!({ "message_len": message.len() }),
            ),
        );
        Ok(reply)
    }

    /// Overwrite the agent's context and reload the cached memory.
    pub fn update_context(&self, context: &str) -> QuorumResult<MemorySnapshot> {
        self.storage
            .memory_update(self.id(), MemoryUpdate::context(context))?;
        let memory = self.reload()?;
        record_event(
            self.storage.as_ref(),
            SystemLogEntry::new(
                events::CONTEXT_UPDATED,
                self.id(),
                None,
                "Context updated",
                json!({ "context_len": context.len() }),
            ),
        );
        Ok(memory.snapshot())
    }

    /// Truncated view of the stored memory.
    pub fn memory_snapshot(&self) -> QuorumResult<MemorySnapshot> {
        Ok(self.reload()?.snapshot())
    }

    /// Current stored memory, or `None` if the record has gone missing.
    pub fn stored_memory(&self) -> QuorumResult<Option<AgentMemory>> {
        self.storage.memory_get(self.id())
    }

    fn reload(&self) -> QuorumResult<AgentMemory> {
        let memory = self
            .storage
            .memory_get(self.id())?
            .ok_or_else(|| StorageError::NotFound {
                entity_type: EntityType::AgentMemory,
                id: self.id().to_string(),
            })?;
        self.replace_cache(memory.clone());
        Ok(memory)
    }
}
