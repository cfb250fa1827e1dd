//! QUORUM Test Utilities
//!
//! Shared test infrastructure for the QUORUM workspace:
//! - Proptest generators for enums and tasks
//! - Fixtures for common scenarios (scripted coordinators, sample tasks)
//! - Custom assertions for QUORUM result values

pub use quorum_llm::{MockCompletionClient, MOCK_DEFAULT_RESPONSE};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Proptest strategies for QUORUM types.
pub mod generators {
    use proptest::prelude::*;
    use quorum_core::{NewTask, Project, Task, TaskPriority, TaskStatus};

    pub fn arb_project() -> impl Strategy<Value = Project> {
        prop::sample::select(Project::ALL.to_vec())
    }

    pub fn arb_status() -> impl Strategy<Value = TaskStatus> {
        prop::sample::select(TaskStatus::ALL.to_vec())
    }

    pub fn arb_priority() -> impl Strategy<Value = TaskPriority> {
        prop::sample::select(TaskPriority::ALL.to_vec())
    }

    /// Non-blank printable titles.
    pub fn arb_title() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,40}"
    }

    pub fn arb_new_task() -> impl Strategy<Value = NewTask> {
        (arb_project(), arb_title(), ".{0,80}", arb_priority()).prop_map(
            |(project, title, description, priority)| {
                NewTask::new(project, title)
                    .with_description(description)
                    .with_priority(priority)
            },
        )
    }

    /// A stored-shape task with an arbitrary status.
    pub fn arb_task() -> impl Strategy<Value = Task> {
        (arb_new_task(), arb_status()).prop_map(|(new_task, status)| {
            let mut task = new_task.into_task();
            task.status = status;
            task
        })
    }

    /// A syntactically valid analysis reply.
    pub fn arb_analysis_json() -> impl Strategy<Value = String> {
        (
            "[a-z ]{1,30}",
            prop::collection::vec("[a-z ]{1,12}", 0..4),
            prop::collection::vec("[a-z ]{1,12}", 0..4),
            prop::option::of(arb_status()),
        )
            .prop_map(|(analysis, plan, subtasks, status)| {
                let mut value = serde_json::json!({
                    "analysis": analysis,
                    "action_plan": plan,
                    "subtasks": subtasks,
                    "next_steps": [],
                    "notes": "",
                });
                if let Some(status) = status {
                    value["suggested_status"] = serde_json::json!(status.as_db_str());
                }
                value.to_string()
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Ready-made values for common test scenarios.
pub mod fixtures {
    use quorum_agents::{default_roster, AgentProfile, Coordinator};
    use quorum_core::{NewTask, Project, Task, TaskPriority, TaskStatus};
    use quorum_llm::MockCompletionClient;
    use quorum_storage::{InMemoryStorage, StorageTrait};
    use std::sync::Arc;

    /// A coordinator over in-memory storage, with handles to its parts.
    pub struct TestCoordinator {
        pub coordinator: Arc<Coordinator>,
        pub storage: Arc<dyn StorageTrait>,
        pub client: Arc<MockCompletionClient>,
    }

    /// Default roster, in-memory storage, scripted client.
    pub fn coordinator_with(client: MockCompletionClient) -> TestCoordinator {
        coordinator_with_roster(client, default_roster())
    }

    pub fn coordinator_with_roster(
        client: MockCompletionClient,
        roster: Vec<AgentProfile>,
    ) -> TestCoordinator {
        let storage: Arc<dyn StorageTrait> = Arc::new(InMemoryStorage::new());
        let client = Arc::new(client);
        let coordinator = Coordinator::new(storage.clone(), client.clone(), roster)
            .unwrap_or_else(|e| panic!("test coordinator: {e}"));
        TestCoordinator {
            coordinator: Arc::new(coordinator),
            storage,
            client,
        }
    }

    /// Coordinator whose client always returns the default mock analysis.
    pub fn mock_coordinator() -> TestCoordinator {
        coordinator_with(MockCompletionClient::new())
    }

    /// Roster without an agent for `missing`.
    pub fn roster_without(missing: Project) -> Vec<AgentProfile> {
        default_roster()
            .into_iter()
            .filter(|p| p.project != missing)
            .collect()
    }

    pub fn billing_task() -> NewTask {
        NewTask::new(Project::ConsorcioOpt, "Analyze billing")
            .with_description("Monthly invoices take too long to reconcile")
            .with_priority(TaskPriority::High)
    }

    pub fn content_task() -> NewTask {
        NewTask::new(Project::SocialConsorcio, "Plan next week's posts")
            .with_priority(TaskPriority::Medium)
    }

    pub fn mentoring_task() -> NewTask {
        NewTask::new(Project::SocialEmprendedores, "Write a pricing guide")
            .with_priority(TaskPriority::Low)
    }

    /// Insert a task with the given status directly into storage.
    pub fn stored_task(storage: &dyn StorageTrait, new_task: NewTask, status: TaskStatus) -> Task {
        let mut task = new_task.into_task();
        task.status = status;
        storage
            .task_insert(&task)
            .unwrap_or_else(|e| panic!("insert fixture task: {e}"));
        task
    }

    /// Analysis reply with the given suggested status.
    pub fn analysis_reply(status: &str) -> String {
        serde_json::json!({
            "analysis": format!("Moving task to {status}"),
            "action_plan": ["Review current state", "Apply changes"],
            "subtasks": ["Collect data", "Draft proposal"],
            "next_steps": ["Report back"],
            "suggested_status": status,
            "notes": "scripted",
        })
        .to_string()
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Custom assertions for QUORUM results.
pub mod assertions {
    use quorum_core::{AgentError, EntityType, QuorumError, QuorumResult, StorageError, Task, TaskStatus};

    /// Assert that a QuorumResult is a NotFound storage error for `entity_type`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &QuorumResult<T>, entity_type: EntityType) {
        match result {
            Err(QuorumError::Storage(StorageError::NotFound { entity_type: e, .. })) => {
                assert_eq!(*e, entity_type, "Wrong entity type in NotFound");
            }
            other => panic!("Expected NotFound({:?}), got: {:?}", entity_type, other),
        }
    }

    /// Assert that a QuorumResult is a Validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &QuorumResult<T>) {
        match result {
            Err(QuorumError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    /// Assert that a QuorumResult is a NoAgentAvailable routing error.
    #[track_caller]
    pub fn assert_no_agent<T: std::fmt::Debug>(result: &QuorumResult<T>) {
        match result {
            Err(QuorumError::Agent(AgentError::NoAgentAvailable { .. })) => {}
            other => panic!("Expected NoAgentAvailable, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_task_status(task: &Task, expected: TaskStatus) {
        assert_eq!(
            task.status, expected,
            "Task {} has status {:?}, expected {:?}",
            task.id, task.status, expected
        );
    }
}
