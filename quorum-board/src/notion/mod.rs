//! Notion database board
//!
//! Tasks become pages in one database with the properties `Name` (title),
//! `Status` (status), `Priority` (select), `Description` and `Assigned To`
//! (rich text).

pub mod client;
pub mod types;

pub use client::NotionClient;

use crate::{priority_label, status_label, BoardTask, TaskBoard};
use async_trait::async_trait;
use quorum_core::{BoardConfig, QuorumResult, Task, TaskStatus};
use reqwest::Method;
use serde_json::{json, Map, Value};
use types::{
    rich_text, status_property, Page, QueryRequest, QueryResponse, PROP_ASSIGNED_TO,
    PROP_DESCRIPTION, PROP_NAME, PROP_PRIORITY, PROP_STATUS,
};

/// [`TaskBoard`] backed by a Notion database.
#[derive(Debug)]
pub struct NotionBoard {
    client: NotionClient,
    database_id: String,
}

impl NotionBoard {
    pub fn new(config: &BoardConfig) -> Self {
        let mut client = NotionClient::new(config.api_key.clone());
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url.clone());
        }
        Self {
            client,
            database_id: config.database_id.clone(),
        }
    }

    fn page_properties(task: &Task) -> Value {
        let mut properties = Map::new();
        properties.insert(PROP_NAME.to_string(), json!({ "title": rich_text(&task.title) }));
        properties.insert(PROP_STATUS.to_string(), status_property(status_label(task.status)));
        properties.insert(
            PROP_PRIORITY.to_string(),
            json!({ "select": { "name": priority_label(task.priority) } }),
        );
        properties.insert(
            PROP_DESCRIPTION.to_string(),
            json!({ "rich_text": rich_text(&task.description) }),
        );
        if let Some(agent) = &task.assigned_agent {
            properties.insert(
                PROP_ASSIGNED_TO.to_string(),
                json!({ "rich_text": rich_text(agent) }),
            );
        }
        Value::Object(properties)
    }
}

#[async_trait]
impl TaskBoard for NotionBoard {
    async fn push_task(&self, task: &Task) -> QuorumResult<String> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": Self::page_properties(task),
        });
        let page: Page = self.client.request(Method::POST, "pages", &body).await?;
        tracing::info!(task_id = %task.id, page_id = %page.id, "Task pushed to Notion");
        Ok(page.id)
    }

    async fn update_status(&self, page_id: &str, status: TaskStatus) -> QuorumResult<()> {
        let body = json!({
            "properties": { PROP_STATUS: status_property(status_label(status)) }
        });
        let _: Page = self
            .client
            .request(Method::PATCH, &format!("pages/{}", page_id), &body)
            .await?;
        Ok(())
    }

    async fn list_tasks(&self, status: Option<TaskStatus>) -> QuorumResult<Vec<BoardTask>> {
        let endpoint = format!("databases/{}/query", self.database_id);
        let filter = status.map(|s| {
            json!({
                "property": PROP_STATUS,
                "status": { "equals": status_label(s) }
            })
        });

        let mut tasks = Vec::new();
        let mut cursor = None;
        loop {
            let request = QueryRequest {
                filter: filter.clone(),
                start_cursor: cursor.take(),
            };
            let response: QueryResponse =
                self.client.request(Method::POST, &endpoint, &request).await?;
            tasks.extend(response.results.into_iter().map(Page::into_board_task));
            match response.next_cursor {
                Some(next) if response.has_more => cursor = Some(next),
                _ => break,
            }
        }
        Ok(tasks)
    }

    async fn add_comment(&self, page_id: &str, text: &str) -> QuorumResult<()> {
        let body = json!({
            "parent": { "page_id": page_id },
            "rich_text": rich_text(text),
        });
        let _: Value = self.client.request(Method::POST, "comments", &body).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "notion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::{NewTask, Project, TaskPriority};

    #[test]
    fn test_page_properties() {
        let mut task = NewTask::new(Project::ConsorcioOpt, "Analyze billing")
            .with_description("Reconcile invoices")
            .with_priority(TaskPriority::High)
            .into_task();
        let props = NotionBoard::page_properties(&task);
        assert_eq!(props["Status"]["status"]["name"], "Not Started");
        assert_eq!(props["Priority"]["select"]["name"], "High");
        assert_eq!(props["Name"]["title"][0]["text"]["content"], "Analyze billing");
        assert!(props.get("Assigned To").is_none());

        task.assigned_agent = Some("OptimizadorConsorcio".to_string());
        let props = NotionBoard::page_properties(&task);
        assert_eq!(
            props["Assigned To"]["rich_text"][0]["text"]["content"],
            "OptimizadorConsorcio"
        );
    }
}
