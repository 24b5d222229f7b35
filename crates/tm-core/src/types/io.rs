use crate::types::enums::{Category, Priority, TaskStatus, TurnKind};
use crate::types::ids::UserId;
use crate::types::task::{Collaboration, Recurrence, Reminder, TaskDraft};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_DURATION_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "duration", default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default = "Reminder::default_set")]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub collaboration: Collaboration,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

impl CreateTaskInput {
    /// Builds a create input from a generator draft. Missing fields fall
    /// back to the model defaults; an absent title becomes the empty
    /// string so validation can report it as a rule violation.
    pub fn from_draft(user_id: UserId, draft: TaskDraft) -> Self {
        Self {
            user_id,
            title: draft.title.unwrap_or_default(),
            description: draft.description.unwrap_or_default(),
            category: draft.category.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            start_date: draft.start_date,
            duration_minutes: draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            status: draft.status.unwrap_or_default(),
            location: draft.location.unwrap_or_default(),
            notes: draft.notes.unwrap_or_default(),
            recurrence: draft.recurrence.unwrap_or_default(),
            reminders: draft.reminders.unwrap_or_else(Reminder::default_set),
            collaboration: draft.collaboration.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "duration", default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub reminders: Option<Vec<Reminder>>,
    #[serde(default)]
    pub collaboration: Option<Collaboration>,
}

impl UpdateTaskInput {
    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            start_date: draft.start_date,
            duration_minutes: draft.duration_minutes,
            status: draft.status,
            location: draft.location,
            notes: draft.notes,
            recurrence: draft.recurrence,
            reminders: draft.reminders,
            collaboration: draft.collaboration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTurnInput {
    pub user_id: UserId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: TurnKind,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
}
