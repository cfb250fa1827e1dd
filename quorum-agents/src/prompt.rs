//! Prompt construction for agents.

use quorum_core::{DecisionEntry, Personality, Project, Task};

/// How many past decisions are shown to the model.
pub const PROMPT_DECISION_LIMIT: usize = 3;

const NO_CONTEXT: &str = "No prior context";

/// System instruction describing who the agent is and what it remembers.
pub fn system_prompt(
    agent_id: &str,
    project: Project,
    personality: &Personality,
    context: Option<&str>,
    recent_decisions: &[DecisionEntry],
) -> String {
    let personality_json =
        serde_json::to_string_pretty(personality).unwrap_or_else(|_| personality.name.clone());
    let start = recent_decisions
        .len()
        .saturating_sub(PROMPT_DECISION_LIMIT);
    let decisions_json = serde_json::to_string_pretty(&recent_decisions[start..])
        .unwrap_or_else(|_| "[]".to_string());
    let context = context.filter(|c| !c.trim().is_empty()).unwrap_or(NO_CONTEXT);

    format!(
        "You are {agent_id}, an autonomous agent working on the project \"{project_name}\".\n\
         Project: {project_description}\n\n\
         PERSONALITY:\n{personality_json}\n\n\
         CURRENT CONTEXT:\n{context}\n\n\
         RECENT DECISIONS:\n{decisions_json}\n\n\
         Stay in character. Be concrete, actionable and consistent with your earlier decisions.",
        project_name = project.display_name(),
        project_description = project.description(),
    )
}

/// User message asking for a structured analysis of `task`.
pub fn task_message(agent_id: &str, task: &Task) -> String {
    format!(
        "NEW TASK ASSIGNED TO {agent_id}\n\n\
         Title: {title}\n\
         Description: {description}\n\
         Priority: {priority}\n\
         Current status: {status}\n\n\
         Analyse this task and reply with ONLY a JSON object with these keys:\n\
         {{\n\
         \x20 \"analysis\": \"your analysis of the task\",\n\
         \x20 \"action_plan\": [\"step 1\", \"step 2\"],\n\
         \x20 \"subtasks\": [\"subtask 1\", \"subtask 2\"],\n\
         \x20 \"next_steps\": [\"next step\"],\n\
         \x20 \"suggested_status\": \"pending|in_progress|completed|blocked\",\n\
         \x20 \"notes\": \"anything else worth recording\"\n\
         }}",
        title = task.title,
        description = if task.description.is_empty() {
            "(none)"
        } else {
            task.description.as_str()
        },
        priority = task.priority,
        status = task.status,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::default_roster;
    use chrono::Utc;
    use quorum_core::{new_entity_id, NewTask, TaskPriority, TaskStatus};

    fn decision(summary: &str) -> DecisionEntry {
        DecisionEntry {
            timestamp: Utc::now(),
            task_id: new_entity_id(),
            suggested_status: Some(TaskStatus::InProgress),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_system_prompt_mentions_identity_and_personality() {
        let profile = &default_roster()[0];
        let prompt = system_prompt(
            &profile.agent_id,
            profile.project,
            &profile.personality,
            None,
            &[],
        );
        assert!(prompt.contains("OptimizadorConsorcio"));
        assert!(prompt.contains("KPI tracking"));
        assert!(prompt.contains(NO_CONTEXT));
    }

    #[test]
    fn test_system_prompt_keeps_last_three_decisions() {
        let profile = &default_roster()[1];
        let decisions: Vec<DecisionEntry> =
            ["d1", "d2", "d3", "d4"].iter().map(|s| decision(s)).collect();
        let prompt = system_prompt(
            &profile.agent_id,
            profile.project,
            &profile.personality,
            Some("Launching the spring campaign"),
            &decisions,
        );
        assert!(!prompt.contains("\"d1\""));
        assert!(prompt.contains("\"d4\""));
        assert!(prompt.contains("spring campaign"));
    }

    #[test]
    fn test_task_message_lists_required_keys() {
        let task = NewTask::new(Project::ConsorcioOpt, "Analyze billing")
            .with_priority(TaskPriority::High)
            .into_task();
        let message = task_message("OptimizadorConsorcio", &task);
        for key in [
            "analysis",
            "action_plan",
            "subtasks",
            "next_steps",
            "suggested_status",
            "notes",
        ] {
            assert!(message.contains(key), "missing {key}");
        }
        assert!(message.contains("Analyze billing"));
        assert!(message.contains("high"));
    }
}
