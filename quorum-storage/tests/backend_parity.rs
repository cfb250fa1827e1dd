//! Both backends must give the same answers for the same operation sequence.

use proptest::prelude::*;
use quorum_core::{
    LogFilter, MemorySeed, NewTask, Personality, Project, SystemLogEntry, TaskFilter, TaskStatus,
};
use quorum_storage::{InMemoryStorage, LmdbStorage, StorageTrait, TaskUpdate};
use tempfile::TempDir;

#[derive(Debug, Clone)]
enum Op {
    Create(Project),
    SetStatus(usize, TaskStatus),
    Delete(usize),
    Log(bool),
}

fn arb_project() -> impl Strategy<Value = Project> {
    prop::sample::select(Project::ALL.to_vec())
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_project().prop_map(Op::Create),
        3 => (0usize..8, arb_status()).prop_map(|(i, s)| Op::SetStatus(i, s)),
        1 => (0usize..8).prop_map(Op::Delete),
        1 => any::<bool>().prop_map(Op::Log),
    ]
}

fn seed() -> MemorySeed {
    MemorySeed {
        agent_id: "agent".to_string(),
        project: Project::ConsorcioOpt,
        personality: Personality {
            name: "agent".to_string(),
            role: String::new(),
            tone: String::new(),
            focus: String::new(),
            specialties: Vec::new(),
            communication_style: String::new(),
        },
    }
}

fn run(storage: &dyn StorageTrait, ops: &[Op], tasks: &[quorum_core::Task]) -> Vec<String> {
    let mut trace = Vec::new();
    let mut created = Vec::new();
    storage.memory_get_or_create(seed()).unwrap();
    let mut next_task = tasks.iter();
    for op in ops {
        match op {
            Op::Create(_) => {
                if let Some(task) = next_task.next() {
                    storage.task_insert(task).unwrap();
                    created.push(task.id);
                }
            }
            Op::SetStatus(i, status) => {
                if let Some(id) = created.get(*i) {
                    let update = TaskUpdate {
                        status: Some(*status),
                        assigned_agent: Some("agent".to_string()),
                        ..TaskUpdate::default()
                    };
                    trace.push(format!("{:?}", storage.task_update(*id, update).map(|t| t.status)));
                }
            }
            Op::Delete(i) => {
                if let Some(id) = created.get(*i) {
                    trace.push(format!("{:?}", storage.task_delete(*id).is_ok()));
                }
            }
            Op::Log(by_agent) => {
                let who = if *by_agent { "agent" } else { "coordinator" };
                storage
                    .log_insert(&SystemLogEntry::new("event", who, None, "x", serde_json::Value::Null))
                    .unwrap();
            }
        }
    }
    let ids: Vec<_> = storage
        .task_list(&TaskFilter::default())
        .unwrap()
        .into_iter()
        .map(|t| (t.id, t.status))
        .collect();
    trace.push(format!("{ids:?}"));
    let logs = storage
        .log_list(&LogFilter {
            agent_id: Some("agent".to_string()),
            ..LogFilter::default()
        })
        .unwrap();
    trace.push(format!("{}", logs.len()));
    let memory = storage.memory_get("agent").unwrap().unwrap();
    trace.push(format!("{}", memory.total_tasks_completed));
    trace
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_backends_agree(ops in prop::collection::vec(arb_op(), 1..30)) {
        let tasks: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Create(project) => Some(NewTask::new(*project, "parity").into_task()),
                _ => None,
            })
            .collect();

        let memory = InMemoryStorage::new();
        let dir = TempDir::new().unwrap();
        let lmdb = LmdbStorage::open(dir.path(), 10).unwrap();

        prop_assert_eq!(run(&memory, &ops, &tasks), run(&lmdb, &ops, &tasks));
    }
}

fn reopen_and_recomplete(storage: &dyn StorageTrait) {
    storage.memory_get_or_create(seed()).unwrap();
    let task = NewTask::new(Project::ConsorcioOpt, "reopen").into_task();
    storage.task_insert(&task).unwrap();

    let complete = TaskUpdate {
        status: Some(TaskStatus::Completed),
        assigned_agent: Some("agent".to_string()),
        ..TaskUpdate::default()
    };
    let first = storage.task_update(task.id, complete.clone()).unwrap();
    let completed_at = first.completed_at;
    assert!(completed_at.is_some());

    storage
        .task_update(task.id, TaskUpdate::status(TaskStatus::InProgress))
        .unwrap();
    let again = storage.task_update(task.id, complete).unwrap();

    assert_eq!(again.status, TaskStatus::Completed);
    assert_eq!(again.completed_at, completed_at);
    let memory = storage.memory_get("agent").unwrap().unwrap();
    assert_eq!(memory.total_tasks_completed, 1);
}

#[test]
fn test_reopened_task_credited_once_in_memory() {
    reopen_and_recomplete(&InMemoryStorage::new());
}

#[test]
fn test_reopened_task_credited_once_in_lmdb() {
    let dir = TempDir::new().unwrap();
    reopen_and_recomplete(&LmdbStorage::open(dir.path(), 10).unwrap());
}
