//! In-process board used in tests and when no external board is configured.

use crate::{priority_label, status_label, BoardTask, TaskBoard};
use async_trait::async_trait;
use quorum_core::{new_entity_id, BoardError, QuorumResult, Task, TaskStatus};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct Entry {
    task: BoardTask,
    comments: Vec<String>,
}

/// Board kept in memory. Page ids are fresh UUIDs.
#[derive(Debug, Default)]
pub struct InMemoryBoard {
    pages: Mutex<BTreeMap<String, Entry>>,
}

impl InMemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comments posted on `page_id`, oldest first.
    pub async fn comments(&self, page_id: &str) -> Vec<String> {
        self.pages
            .lock()
            .await
            .get(page_id)
            .map(|e| e.comments.clone())
            .unwrap_or_default()
    }
}

fn missing_page(page_id: &str) -> BoardError {
    BoardError::RequestFailed {
        status: 404,
        message: format!("Page not found: {page_id}"),
    }
}

#[async_trait]
impl TaskBoard for InMemoryBoard {
    async fn push_task(&self, task: &Task) -> QuorumResult<String> {
        let page_id = new_entity_id().to_string();
        let entry = Entry {
            task: BoardTask {
                page_id: page_id.clone(),
                title: task.title.clone(),
                description: task.description.clone(),
                status: Some(task.status),
                status_label: Some(status_label(task.status).to_string()),
                priority: Some(task.priority),
                assigned_to: task.assigned_agent.clone(),
            },
            comments: Vec::new(),
        };
        tracing::debug!(page_id = %page_id, priority = priority_label(task.priority), "Board page created");
        self.pages.lock().await.insert(page_id.clone(), entry);
        Ok(page_id)
    }

    async fn update_status(&self, page_id: &str, status: TaskStatus) -> QuorumResult<()> {
        let mut pages = self.pages.lock().await;
        let entry = pages.get_mut(page_id).ok_or_else(|| missing_page(page_id))?;
        entry.task.status = Some(status);
        entry.task.status_label = Some(status_label(status).to_string());
        Ok(())
    }

    async fn list_tasks(&self, status: Option<TaskStatus>) -> QuorumResult<Vec<BoardTask>> {
        Ok(self
            .pages
            .lock()
            .await
            .values()
            .filter(|e| status.is_none_or(|s| e.task.status == Some(s)))
            .map(|e| e.task.clone())
            .collect())
    }

    async fn add_comment(&self, page_id: &str, text: &str) -> QuorumResult<()> {
        let mut pages = self.pages.lock().await;
        let entry = pages.get_mut(page_id).ok_or_else(|| missing_page(page_id))?;
        entry.comments.push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::{NewTask, Project, QuorumError};

    #[tokio::test]
    async fn test_push_update_and_filter() {
        let board = InMemoryBoard::new();
        let task = NewTask::new(Project::ConsorcioOpt, "Analyze billing").into_task();
        let page = board.push_task(&task).await.unwrap();

        let pending = board.list_tasks(Some(TaskStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].status_label.as_deref(), Some("Not Started"));

        board.update_status(&page, TaskStatus::Completed).await.unwrap();
        assert!(board.list_tasks(Some(TaskStatus::Pending)).await.unwrap().is_empty());
        let all = board.list_tasks(None).await.unwrap();
        assert_eq!(all[0].status_label.as_deref(), Some("Done"));
    }

    #[tokio::test]
    async fn test_comments_and_missing_pages() {
        let board = InMemoryBoard::new();
        let task = NewTask::new(Project::SocialConsorcio, "Plan posts").into_task();
        let page = board.push_task(&task).await.unwrap();
        board.add_comment(&page, "first draft ready").await.unwrap();
        assert_eq!(board.comments(&page).await, vec!["first draft ready"]);

        let err = board.add_comment("nope", "x").await.unwrap_err();
        assert!(matches!(err, QuorumError::Board(BoardError::RequestFailed { status: 404, .. })));
    }
}
