//! Notion API request and response shapes

use crate::{priority_from_label, status_from_label, BoardTask};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const PROP_NAME: &str = "Name";
pub const PROP_STATUS: &str = "Status";
pub const PROP_PRIORITY: &str = "Priority";
pub const PROP_DESCRIPTION: &str = "Description";
pub const PROP_ASSIGNED_TO: &str = "Assigned To";

/// Notion rejects rich text objects longer than this.
const MAX_TEXT_LEN: usize = 2000;

/// Rich text array for `content`, split into objects of at most
/// `MAX_TEXT_LEN` characters.
pub(crate) fn rich_text(content: &str) -> Value {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return json!([{ "text": { "content": "" } }]);
    }
    let parts: Vec<Value> = chars
        .chunks(MAX_TEXT_LEN)
        .map(|chunk| json!({ "text": { "content": chunk.iter().collect::<String>() } }))
        .collect();
    Value::Array(parts)
}

pub(crate) fn status_property(label: &str) -> Value {
    json!({ "status": { "name": label } })
}

/// Database query body. `start_cursor` continues a paged result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// One page property. Only the kinds QUORUM writes are read back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub title: Option<Vec<RichText>>,
    #[serde(default)]
    pub rich_text: Option<Vec<RichText>>,
    #[serde(default)]
    pub status: Option<SelectOption>,
    #[serde(default)]
    pub select: Option<SelectOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

fn join_text(parts: &[RichText]) -> String {
    parts
        .iter()
        .filter_map(|p| p.plain_text.as_deref())
        .collect()
}

impl Page {
    fn text(&self, name: &str) -> Option<String> {
        let prop = self.properties.get(name)?;
        prop.title
            .as_deref()
            .or(prop.rich_text.as_deref())
            .map(join_text)
    }

    fn option(&self, name: &str) -> Option<String> {
        let prop = self.properties.get(name)?;
        prop.status
            .as_ref()
            .or(prop.select.as_ref())
            .map(|o| o.name.clone())
    }

    pub fn into_board_task(self) -> BoardTask {
        let status_label = self.option(PROP_STATUS);
        let priority_label = self.option(PROP_PRIORITY);
        BoardTask {
            title: self.text(PROP_NAME).unwrap_or_default(),
            description: self.text(PROP_DESCRIPTION).unwrap_or_default(),
            status: status_label.as_deref().and_then(status_from_label),
            priority: priority_label.as_deref().and_then(priority_from_label),
            assigned_to: self.text(PROP_ASSIGNED_TO).filter(|s| !s.is_empty()),
            status_label,
            page_id: self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::{TaskPriority, TaskStatus};

    #[test]
    fn test_page_into_board_task() {
        let page: Page = serde_json::from_value(json!({
            "object": "page",
            "id": "abc",
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "Analyze "}, {"plain_text": "billing"}]},
                "Status": {"type": "status", "status": {"name": "In Progress"}},
                "Priority": {"type": "select", "select": {"name": "High"}},
                "Description": {"type": "rich_text", "rich_text": []},
                "Owner": {"type": "people", "people": []}
            }
        }))
        .unwrap();

        let task = page.into_board_task();
        assert_eq!(task.page_id, "abc");
        assert_eq!(task.title, "Analyze billing");
        assert_eq!(task.status, Some(TaskStatus::InProgress));
        assert_eq!(task.priority, Some(TaskPriority::High));
        assert_eq!(task.description, "");
        assert_eq!(task.assigned_to, None);
    }

    #[test]
    fn test_unknown_status_keeps_label() {
        let page: Page = serde_json::from_value(json!({
            "id": "x",
            "properties": {"Status": {"status": {"name": "Archived"}}}
        }))
        .unwrap();
        let task = page.into_board_task();
        assert_eq!(task.status, None);
        assert_eq!(task.status_label.as_deref(), Some("Archived"));
    }

    #[test]
    fn test_long_rich_text_is_split_without_loss() {
        let text = format!("{}é{}", "a".repeat(MAX_TEXT_LEN - 1), "b".repeat(3000));
        let value = rich_text(&text);
        let parts = value.as_array().unwrap();
        assert_eq!(parts.len(), 3);

        let contents: Vec<&str> = parts
            .iter()
            .map(|p| p["text"]["content"].as_str().unwrap())
            .collect();
        assert!(contents.iter().all(|c| c.chars().count() <= MAX_TEXT_LEN));
        assert_eq!(contents[0].chars().count(), MAX_TEXT_LEN);
        assert!(contents[0].ends_with('é'));
        assert_eq!(contents.concat(), text);
    }

    #[test]
    fn test_short_rich_text_is_one_object() {
        assert_eq!(rich_text(""), json!([{ "text": { "content": "" } }]));
        assert_eq!(rich_text("hi").as_array().unwrap().len(), 1);
    }
}
