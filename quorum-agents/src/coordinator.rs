//! The coordinator: fixed agent registry and task routing.

use crate::agent::Agent;
use crate::analysis::TaskAnalysis;
use crate::events;
use crate::locks::TaskLocks;
use crate::record_event;
use crate::roster::{default_roster, AgentProfile};
use chrono::Utc;
use quorum_core::{
    AgentError, EntityId, EntityType, LogFilter, NewTask, Personality, Project, QuorumResult,
    StorageError, SystemLogEntry, Task, TaskFilter, TaskStatus, Timestamp, ValidationError,
};
use quorum_llm::CompletionClient;
use quorum_storage::{StorageTrait, TaskUpdate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Agent id recorded on audit entries written by the coordinator itself.
pub const COORDINATOR_ID: &str = "coordinator";

/// Outcome of routing one task to its agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Assignment {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Uuid))]
    pub task_id: EntityId,
    pub agent_id: String,
    pub result: TaskAnalysis,
    /// The task as stored after the result was applied.
    pub task: Task,
}

/// Static personality joined with live memory counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AgentStatusReport {
    pub agent_id: String,
    pub project: Project,
    pub personality: Personality,
    /// `None` when the agent has no stored memory.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub last_active: Option<Timestamp>,
    pub total_tasks_completed: u64,
    pub context: Option<String>,
}

/// Whole-system summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SystemReport {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub timestamp: Timestamp,
    pub total_tasks: usize,
    pub tasks_by_status: BTreeMap<TaskStatus, usize>,
    pub tasks_by_project: BTreeMap<Project, usize>,
    pub agents: BTreeMap<Project, AgentStatusReport>,
}

/// Summary of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProjectStatus {
    pub project: Project,
    pub total_tasks: usize,
    pub tasks_by_status: BTreeMap<TaskStatus, usize>,
    pub agent: Option<AgentStatusReport>,
}

/// Owns one agent per project and mediates every task-to-agent interaction.
///
/// The registry is fixed at construction. Assignments on the same task id
/// are serialized; different tasks proceed concurrently.
pub struct Coordinator {
    agents: BTreeMap<Project, Agent>,
    storage: Arc<dyn StorageTrait>,
    locks: TaskLocks,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("agents", &self.agents)
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Build the registry from `roster`. Project and agent id must each be
    /// unique.
    pub fn new(
        storage: Arc<dyn StorageTrait>,
        client: Arc<dyn CompletionClient>,
        roster: Vec<AgentProfile>,
    ) -> QuorumResult<Self> {
        let mut agents = BTreeMap::new();
        let mut ids = BTreeSet::new();
        for profile in roster {
            if agents.contains_key(&profile.project) || !ids.insert(profile.agent_id.clone()) {
                return Err(AgentError::DuplicateAgent {
                    agent_id: profile.agent_id,
                    project: profile.project.to_string(),
                }
                .into());
            }
            let project = profile.project;
            let agent = Agent::new(profile, Arc::clone(&storage), Arc::clone(&client))?;
            agents.insert(project, agent);
        }
        info!(agents = agents.len(), "Coordinator ready");
        Ok(Self {
            agents,
            storage,
            locks: TaskLocks::new(),
        })
    }

    /// Coordinator with the built-in three-agent roster.
    pub fn with_default_roster(
        storage: Arc<dyn StorageTrait>,
        client: Arc<dyn CompletionClient>,
    ) -> QuorumResult<Self> {
        Self::new(storage, client, default_roster())
    }

    pub fn get_agent(&self, project: Project) -> Option<&Agent> {
        self.agents.get(&project)
    }

    /// Like [`Self::get_agent`] but reports a routing error.
    pub fn agent_for(&self, project: Project) -> QuorumResult<&Agent> {
        self.get_agent(project).ok_or_else(|| {
            AgentError::NoAgentAvailable {
                project: project.to_string(),
            }
            .into()
        })
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn storage(&self) -> &Arc<dyn StorageTrait> {
        &self.storage
    }

    // ------------------------------------------------------------------
    // Assignment
    // ------------------------------------------------------------------

    /// Route `task` to its project's agent and store the result on the task.
    ///
    /// Routing uses the stored record, not the caller's copy. The task is
    /// claimed (`assigned_agent`, `in_progress`) before the model is called,
    /// then updated with the analysis. If no agent serves the project the
    /// task is not touched.
    pub async fn assign_task(&self, task: &Task) -> QuorumResult<Assignment> {
        let _guard = self.locks.acquire(task.id).await;
        let stored = self.get_task(task.id)?;
        let agent = self.agent_for(stored.project)?;

        let claimed = self.storage.task_update(
            task.id,
            TaskUpdate {
                assigned_agent: Some(agent.id().to_string()),
                status: Some(TaskStatus::InProgress),
                ..TaskUpdate::default()
            },
        )?;
        info!(task_id = %task.id, agent_id = %agent.id(), "Task claimed");

        let result = agent.process(&claimed).await?;

        let next = result.effective_status();
        if !claimed.status.can_transition_to(next) {
            warn!(
                task_id = %task.id,
                from = %claimed.status,
                to = %next,
                "Agent suggested an unusual status transition"
            );
        }
        let notes = serde_json::to_string_pretty(&result).map_err(|e| {
            StorageError::Serialization {
                entity_type: EntityType::Task,
                reason: e.to_string(),
            }
        })?;
        let updated = self.storage.task_update(
            task.id,
            TaskUpdate {
                status: Some(next),
                notes: Some(notes),
                subtasks: Some(result.subtasks.clone()),
                ..TaskUpdate::default()
            },
        )?;

        record_event(
            self.storage.as_ref(),
            SystemLogEntry::new(
                events::TASK_ASSIGNED,
                COORDINATOR_ID,
                Some(task.id),
                format!("Task assigned to {}", agent.id()),
                json!({ "agent_id": agent.id(), "status": next }),
            ),
        );

        Ok(Assignment {
            task_id: task.id,
            agent_id: agent.id().to_string(),
            result,
            task: updated,
        })
    }

    /// Manually (re)assign a stored task, moving it to `project` first if it
    /// belongs elsewhere.
    pub async fn reassign_task(&self, task_id: EntityId, project: Project) -> QuorumResult<Assignment> {
        self.agent_for(project)?;
        let mut task = self.get_task(task_id)?;
        if task.project != project {
            task = self.storage.task_update(
                task_id,
                TaskUpdate {
                    project: Some(project),
                    ..TaskUpdate::default()
                },
            )?;
            info!(task_id = %task_id, project = %project, "Task moved to another project");
        }
        self.assign_task(&task).await
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    fn status_of(&self, agent: &Agent) -> QuorumResult<AgentStatusReport> {
        let memory = agent.stored_memory()?;
        Ok(AgentStatusReport {
            agent_id: agent.id().to_string(),
            project: agent.project(),
            personality: agent.personality().clone(),
            last_active: memory.as_ref().map(|m| m.last_active),
            total_tasks_completed: memory.as_ref().map_or(0, |m| m.total_tasks_completed),
            context: memory.and_then(|m| m.context),
        })
    }

    /// Status of every registered agent, keyed by project.
    pub fn get_all_agents_status(&self) -> QuorumResult<BTreeMap<Project, AgentStatusReport>> {
        self.agents
            .iter()
            .map(|(project, agent)| Ok((*project, self.status_of(agent)?)))
            .collect()
    }

    /// Task counts by status and by project, plus every agent's status.
    /// Only non-zero counts are included.
    pub fn generate_report(&self) -> QuorumResult<SystemReport> {
        let tasks = self.storage.task_list(&TaskFilter::default())?;
        let mut tasks_by_project = BTreeMap::new();
        for task in &tasks {
            *tasks_by_project.entry(task.project).or_insert(0) += 1;
        }
        Ok(SystemReport {
            timestamp: Utc::now(),
            total_tasks: tasks.len(),
            tasks_by_status: count_by_status(&tasks),
            tasks_by_project,
            agents: self.get_all_agents_status()?,
        })
    }

    pub fn project_status(&self, project: Project) -> QuorumResult<ProjectStatus> {
        let tasks = self.storage.task_list(&TaskFilter::project(project))?;
        let agent = self.get_agent(project).map(|a| self.status_of(a)).transpose()?;
        Ok(ProjectStatus {
            project,
            total_tasks: tasks.len(),
            tasks_by_status: count_by_status(&tasks),
            agent,
        })
    }

    // ------------------------------------------------------------------
    // Task call-throughs
    // ------------------------------------------------------------------

    pub fn create_task(&self, new_task: NewTask) -> QuorumResult<Task> {
        if new_task.title.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "title".to_string(),
            }
            .into());
        }
        let task = new_task.into_task();
        self.storage.task_insert(&task)?;
        record_event(
            self.storage.as_ref(),
            SystemLogEntry::new(
                events::TASK_CREATED,
                COORDINATOR_ID,
                Some(task.id),
                format!("Task created: {}", task.title),
                json!({ "project": task.project, "priority": task.priority }),
            ),
        );
        Ok(task)
    }

    pub fn get_task(&self, id: EntityId) -> QuorumResult<Task> {
        self.storage.task_get(id)?.ok_or_else(|| {
            StorageError::NotFound {
                entity_type: EntityType::Task,
                id: id.to_string(),
            }
            .into()
        })
    }

    pub fn list_tasks(&self, filter: &TaskFilter) -> QuorumResult<Vec<Task>> {
        self.storage.task_list(filter)
    }

    pub fn update_task(&self, id: EntityId, update: TaskUpdate) -> QuorumResult<Task> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate {
                entity_type: EntityType::Task,
            }
            .into());
        }
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        let fields = changed_fields(&update);
        let task = self.storage.task_update(id, update)?;
        record_event(
            self.storage.as_ref(),
            SystemLogEntry::new(
                events::TASK_UPDATED,
                COORDINATOR_ID,
                Some(id),
                format!("Task updated: {}", task.title),
                json!({ "fields": fields, "status": task.status }),
            ),
        );
        Ok(task)
    }

    pub fn delete_task(&self, id: EntityId) -> QuorumResult<()> {
        self.storage.task_delete(id)?;
        record_event(
            self.storage.as_ref(),
            SystemLogEntry::new(
                events::TASK_DELETED,
                COORDINATOR_ID,
                Some(id),
                "Task deleted",
                json!({}),
            ),
        );
        Ok(())
    }

    /// Audit entries, newest first.
    pub fn logs(&self, filter: &LogFilter) -> QuorumResult<Vec<SystemLogEntry>> {
        self.storage.log_list(filter)
    }
}

fn count_by_status(tasks: &[Task]) -> BTreeMap<TaskStatus, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        *counts.entry(task.status).or_insert(0) += 1;
    }
    counts
}

fn changed_fields(update: &TaskUpdate) -> Vec<&'static str> {
    [
        ("project", update.project.is_some()),
        ("title", update.title.is_some()),
        ("description", update.description.is_some()),
        ("status", update.status.is_some()),
        ("priority", update.priority.is_some()),
        ("assigned_agent", update.assigned_agent.is_some()),
        ("notes", update.notes.is_some()),
        ("subtasks", update.subtasks.is_some()),
        ("metadata", update.metadata.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then_some(name))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_llm::MockCompletionClient;
    use quorum_storage::InMemoryStorage;

    fn coordinator() -> Coordinator {
        Coordinator::with_default_roster(
            Arc::new(InMemoryStorage::new()),
            Arc::new(MockCompletionClient::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_project_rejected() {
        let mut roster = default_roster();
        let mut extra = roster[0].clone();
        extra.agent_id = "SecondOptimizer".to_string();
        roster.push(extra);
        let err = Coordinator::new(
            Arc::new(InMemoryStorage::new()),
            Arc::new(MockCompletionClient::new()),
            roster,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            quorum_core::QuorumError::Agent(AgentError::DuplicateAgent { .. })
        ));
    }

    #[test]
    fn test_get_agent_is_a_lookup() {
        let coordinator = coordinator();
        assert_eq!(coordinator.agent_count(), 3);
        let agent = coordinator.get_agent(Project::SocialEmprendedores).unwrap();
        assert_eq!(agent.id(), "MentorEmprendedor");
    }

    #[test]
    fn test_create_task_requires_title() {
        let coordinator = coordinator();
        let err = coordinator
            .create_task(NewTask::new(Project::ConsorcioOpt, "   "))
            .unwrap_err();
        assert!(matches!(
            err,
            quorum_core::QuorumError::Validation(ValidationError::RequiredFieldMissing { .. })
        ));
    }

    #[test]
    fn test_empty_update_rejected() {
        let coordinator = coordinator();
        let task = coordinator
            .create_task(NewTask::new(Project::ConsorcioOpt, "t"))
            .unwrap();
        let err = coordinator
            .update_task(task.id, TaskUpdate::default())
            .unwrap_err();
        assert!(matches!(
            err,
            quorum_core::QuorumError::Validation(ValidationError::EmptyUpdate { .. })
        ));
    }

    #[test]
    fn test_get_missing_task_is_not_found() {
        let coordinator = coordinator();
        let err = coordinator.get_task(quorum_core::new_entity_id()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_crud_writes_audit_entries() {
        let coordinator = coordinator();
        let task = coordinator
            .create_task(NewTask::new(Project::SocialConsorcio, "Plan posts"))
            .unwrap();
        coordinator
            .update_task(task.id, TaskUpdate::status(TaskStatus::Blocked))
            .unwrap();
        coordinator.delete_task(task.id).unwrap();

        let logs = coordinator.logs(&LogFilter::default()).unwrap();
        let kinds: Vec<&str> = logs.iter().map(|l| l.event_type.as_str()).collect();
        assert_eq!(
            kinds,
            vec![events::TASK_DELETED, events::TASK_UPDATED, events::TASK_CREATED]
        );
        assert!(logs.iter().all(|l| l.agent_id == COORDINATOR_ID));
        assert_eq!(logs[1].metadata["fields"], json!(["status"]));
    }

    #[test]
    fn test_changed_fields() {
        let update = TaskUpdate {
            title: Some("x".to_string()),
            notes: Some("y".to_string()),
            ..TaskUpdate::default()
        };
        assert_eq!(changed_fields(&update), vec!["title", "notes"]);
    }
}
