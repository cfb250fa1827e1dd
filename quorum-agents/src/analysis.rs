//! Structured task analysis returned by an agent.

use quorum_core::TaskStatus;
use serde::{Deserialize, Serialize};

/// Analysis text used by the fallback record.
pub const FALLBACK_ANALYSIS: &str = "processing error";

/// The fixed shape an agent asks the model for.
///
/// Parsing is strict: every list and the analysis text are required and
/// must have the right type, and `suggested_status` must be one of the task
/// states. `suggested_status` and `notes` may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskAnalysis {
    #[serde(alias = "analisis")]
    pub analysis: String,
    #[serde(alias = "plan_accion")]
    pub action_plan: Vec<String>,
    #[serde(alias = "subtareas")]
    pub subtasks: Vec<String>,
    #[serde(alias = "proximos_pasos")]
    pub next_steps: Vec<String>,
    #[serde(default, alias = "estado_sugerido")]
    pub suggested_status: Option<TaskStatus>,
    #[serde(default, alias = "notas")]
    pub notes: String,
    /// Set only on the fallback record.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskAnalysis {
    /// Parse model output. A surrounding markdown code fence is tolerated;
    /// anything else that is not the exact shape is rejected with a reason.
    pub fn parse(text: &str) -> Result<Self, String> {
        let body = strip_code_fence(text.trim());
        if body.is_empty() {
            return Err("empty completion".to_string());
        }
        serde_json::from_str(body).map_err(|e| format!("malformed analysis: {e}"))
    }

    /// The record returned when the model call or parsing fails.
    pub fn fallback(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            analysis: FALLBACK_ANALYSIS.to_string(),
            action_plan: Vec::new(),
            subtasks: Vec::new(),
            next_steps: Vec::new(),
            suggested_status: Some(TaskStatus::Blocked),
            notes: format!("Error: {reason}"),
            error: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }

    /// Status the coordinator should apply.
    pub fn effective_status(&self) -> TaskStatus {
        self.suggested_status.unwrap_or(TaskStatus::InProgress)
    }

    /// Short one-line description for decision history.
    pub fn summary(&self) -> String {
        const MAX_CHARS: usize = 200;
        let line = self.analysis.lines().next().unwrap_or_default().trim();
        if line.chars().count() > MAX_CHARS {
            let cut: String = line.chars().take(MAX_CHARS).collect();
            format!("{cut}...")
        } else {
            line.to_string()
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "analysis": "Billing is slow",
        "action_plan": ["Audit invoices", "Automate reminders"],
        "subtasks": ["Export ledger"],
        "next_steps": ["Call the bank"],
        "suggested_status": "in_progress",
        "notes": "Check Q3"
    }"#;

    #[test]
    fn test_parse_valid() {
        let analysis = TaskAnalysis::parse(VALID).unwrap();
        assert_eq!(analysis.action_plan.len(), 2);
        assert_eq!(analysis.suggested_status, Some(TaskStatus::InProgress));
        assert!(!analysis.is_fallback());
    }

    #[test]
    fn test_parse_spanish_keys() {
        let text = r#"{"analisis":"ok","plan_accion":[],"subtareas":["a"],"proximos_pasos":[],"estado_sugerido":"completed","notas":"n"}"#;
        let analysis = TaskAnalysis::parse(text).unwrap();
        assert_eq!(analysis.subtasks, vec!["a"]);
        assert_eq!(analysis.suggested_status, Some(TaskStatus::Completed));
    }

    #[test]
    fn test_parse_fenced() {
        let fenced = format!("```json\n{VALID}\n```");
        assert!(TaskAnalysis::parse(&fenced).is_ok());
        let bare_fence = format!("```\n{VALID}\n```");
        assert!(TaskAnalysis::parse(&bare_fence).is_ok());
    }

    #[test]
    fn test_optional_fields_default() {
        let text = r#"{"analysis":"a","action_plan":[],"subtasks":[],"next_steps":[]}"#;
        let analysis = TaskAnalysis::parse(text).unwrap();
        assert_eq!(analysis.suggested_status, None);
        assert_eq!(analysis.effective_status(), TaskStatus::InProgress);
        assert_eq!(analysis.notes, "");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(TaskAnalysis::parse("").is_err());
        assert!(TaskAnalysis::parse("Sure! Here is my plan.").is_err());
        // missing list
        assert!(TaskAnalysis::parse(r#"{"analysis":"a","subtasks":[],"next_steps":[]}"#).is_err());
        // wrong type
        assert!(TaskAnalysis::parse(
            r#"{"analysis":"a","action_plan":"do it","subtasks":[],"next_steps":[]}"#
        )
        .is_err());
        // unknown status
        assert!(TaskAnalysis::parse(
            r#"{"analysis":"a","action_plan":[],"subtasks":[],"next_steps":[],"suggested_status":"done"}"#
        )
        .is_err());
    }

    #[test]
    fn test_error_key_from_model_is_ignored() {
        let text = r#"{"analysis":"a","action_plan":[],"subtasks":[],"next_steps":[],"error":"x"}"#;
        let analysis = TaskAnalysis::parse(text).unwrap();
        assert!(!analysis.is_fallback());
    }

    #[test]
    fn test_fallback_shape() {
        let fallback = TaskAnalysis::fallback("timeout");
        assert_eq!(fallback.analysis, FALLBACK_ANALYSIS);
        assert!(fallback.action_plan.is_empty());
        assert!(fallback.subtasks.is_empty());
        assert!(fallback.next_steps.is_empty());
        assert_eq!(fallback.suggested_status, Some(TaskStatus::Blocked));
        assert!(fallback.notes.contains("timeout"));
        assert!(fallback.is_fallback());
    }

    #[test]
    fn test_summary_truncates() {
        let mut analysis = TaskAnalysis::fallback("x");
        analysis.analysis = "a".repeat(300);
        assert_eq!(analysis.summary().chars().count(), 203);
        analysis.analysis = "first line\nsecond".to_string();
        assert_eq!(analysis.summary(), "first line");
    }
}
