//! Per-task mutual exclusion for the coordinator.

use dashmap::DashMap;
use quorum_core::EntityId;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async locks, one per task id. Entries are dropped once no holder
/// or waiter remains.
#[derive(Debug, Default, Clone)]
pub struct TaskLocks {
    locks: Arc<DashMap<EntityId, Arc<Mutex<()>>>>,
}

impl TaskLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no one else holds `task_id`.
    pub async fn acquire(&self, task_id: EntityId) -> TaskLockGuard {
        let mutex = self
            .locks
            .entry(task_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        TaskLockGuard {
            guard: Some(guard),
            task_id,
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of tasks with a live holder or waiter.
    pub fn active(&self) -> usize {
        self.locks.len()
    }
}

/// Held while a task is being worked on.
#[derive(Debug)]
pub struct TaskLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    task_id: EntityId,
    locks: Arc<DashMap<EntityId, Arc<Mutex<()>>>>,
}

impl Drop for TaskLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.task_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::new_entity_id;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_entry_removed_after_release() {
        let locks = TaskLocks::new();
        let id = new_entity_id();
        {
            let _guard = locks.acquire(id).await;
            assert_eq!(locks.active(), 1);
        }
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_task_is_serialized() {
        let locks = TaskLocks::new();
        let id = new_entity_id();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let inside = Arc::clone(&inside);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(locks.active(), 0);
    }

    #[tokio::test]
    async fn test_different_tasks_do_not_block() {
        let locks = TaskLocks::new();
        let _a = locks.acquire(new_entity_id()).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(new_entity_id())).await;
        assert!(b.is_ok());
        assert_eq!(locks.active(), 2);
    }
}
