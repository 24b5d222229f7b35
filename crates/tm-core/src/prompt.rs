//! Instruction prompt composition for the completion endpoint.
//!
//! The reference date is always passed in by the caller so composition
//! stays deterministic under test.

use crate::types::enums::ChatIntent;
use crate::types::task::Task;
use chrono::{DateTime, Utc};

/// How many existing tasks ride along as scheduling context.
pub const CONTEXT_TASK_LIMIT: usize = 5;

const SYSTEM_PROMPT: &str = r#"You are an intelligent task management assistant. Your job is to:

1. Parse natural language input to extract task details
2. Create structured task objects with proper scheduling
3. Handle follow-up questions and modifications
4. Resolve time conflicts
5. Suggest optimal scheduling

Always respond with a single JSON object:
- "action": "create_task" | "update_task" | "query" | "conflict_resolution" | "error"
- "task_data": array of task objects (if creating/updating); reference an existing task with "task_id"
- "message": friendly response to the user
- "suggestions": array of helpful suggestions

Parse dates intelligently:
- "Monday at 9 PM" = next Monday at 21:00
- "every Monday" = weekly recurrence
- "daily" or "every day" = Daily
- "monthly" or "every month" = Monthly
- "yearly" or "every year" = Yearly

Categories: Personal, Work, Health, Education, Shopping, Travel, Entertainment
Priorities: Low, Medium, High, Urgent"#;

/// Builds the full instruction + context + user message string for one
/// generator call.
pub fn compose(
    now: DateTime<Utc>,
    intent: Option<ChatIntent>,
    existing: &[Task],
    user_message: &str,
) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str(&format!("\n\nCurrent date: {}", now.to_rfc3339()));

    if let Some(intent) = intent {
        prompt.push_str(&format!("\n\nRequested mode: {intent}"));
    }

    let context_window = existing
        .len()
        .saturating_sub(CONTEXT_TASK_LIMIT);
    let recent = &existing[context_window..];
    if !recent.is_empty() {
        let rendered = serde_json::to_string_pretty(recent).unwrap_or_else(|_| "[]".to_string());
        prompt.push_str(&format!("\n\nExisting tasks for context:\n{rendered}"));
    }

    prompt.push_str(&format!("\n\nUser: {user_message}"));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::enums::{Category, Priority, TaskStatus};
    use crate::types::ids::{TaskId, UserId};
    use crate::types::task::{Collaboration, Recurrence, Reminder};

    fn task(title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::generate(),
            user_id: UserId::default(),
            title: title.to_string(),
            description: String::new(),
            category: Category::Personal,
            priority: Priority::Medium,
            start_date: None,
            duration_minutes: 30,
            status: TaskStatus::Pending,
            location: String::new(),
            notes: String::new(),
            recurrence: Recurrence::default(),
            reminders: Reminder::default_set(),
            collaboration: Collaboration::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn carries_date_message_and_contract() {
        let now: DateTime<Utc> = "2026-08-06T12:00:00Z".parse().unwrap();
        let prompt = compose(now, None, &[], "Plan my day");
        assert!(prompt.contains("Current date: 2026-08-06"));
        assert!(prompt.contains("User: Plan my day"));
        assert!(prompt.contains("Categories: Personal, Work"));
        assert!(!prompt.contains("Existing tasks for context"));
    }

    #[test]
    fn includes_only_the_most_recent_tasks() {
        let tasks: Vec<Task> = (0..7).map(|n| task(&format!("Task {n}"))).collect();
        let prompt = compose(Utc::now(), None, &tasks, "hi");
        assert!(!prompt.contains("Task 1"));
        assert!(prompt.contains("Task 2"));
        assert!(prompt.contains("Task 6"));
    }

    #[test]
    fn names_the_requested_mode() {
        let prompt = compose(Utc::now(), Some(ChatIntent::CreateRoutine), &[], "hi");
        assert!(prompt.contains("Requested mode: create_routine"));
    }
}
