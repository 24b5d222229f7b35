use crate::types::enums::{Category, Priority, RecurrenceKind, TaskStatus};
use crate::types::ids::{TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One schedulable unit of user work.
///
/// Wire field names are camelCase to match the shapes the generator is
/// prompted with and the clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub start_date: Option<DateTime<Utc>>,
    /// Duration in minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub status: TaskStatus,
    pub location: String,
    pub notes: String,
    pub recurrence: Recurrence,
    pub reminders: Vec<Reminder>,
    pub collaboration: Collaboration,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// End of the occupied window, when the task is scheduled at all.
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .map(|start| start + chrono::Duration::minutes(i64::from(self.duration_minutes)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    pub interval: u32,
    pub days_of_week: Vec<u8>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            kind: RecurrenceKind::None,
            interval: 1,
            days_of_week: Vec::new(),
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(rename = "type")]
    pub kind: String,
    pub minutes_before: u32,
}

impl Reminder {
    pub fn default_set() -> Vec<Self> {
        vec![Self {
            kind: "Daily".to_string(),
            minutes_before: 15,
        }]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    pub is_shared: bool,
    pub shared_with: Vec<String>,
}

/// Partial task shape as the generator emits it: every field optional,
/// snake_case aliases tolerated because the model does not keep casing
/// stable across replies.
///
/// `task_id` is the canonical reference field for update actions;
/// historical spellings are accepted as aliases but never produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(
        default,
        alias = "task_id",
        alias = "taskID",
        alias = "task_identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, alias = "start_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        rename = "duration",
        alias = "duration_minutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<Reminder>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaboration: Option<Collaboration>,
}
