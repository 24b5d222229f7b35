use crate::types::ids::UserId;
use crate::types::task::{Task, TaskDraft};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tm_ai::reply::AiAction;
use utoipa::ToSchema;

pub const MAX_MESSAGE_LEN: usize = 1000;

/// Inbound chat request after HTTP decoding. `intent` stays a raw string
/// here so the orchestration layer owns the membership check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    #[serde(default)]
    pub user_id: UserId,
    pub message: String,
    #[serde(default)]
    pub intent: Option<String>,
}

/// Request to schedule a previously conflicting proposal at a chosen time.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveConflictInput {
    #[serde(default)]
    pub user_id: UserId,
    pub task: TaskDraft,
    pub start_date: DateTime<Utc>,
}

/// A conflict-free alternative slot, with a human phrasing of how far it
/// sits from the originally requested time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSlot {
    pub time: DateTime<Utc>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflicts: Vec<Task>,
    /// The proposed task exactly as the generator shaped it; not persisted.
    pub proposed_task: TaskDraft,
    pub alternatives: Vec<AlternativeSlot>,
}

/// Body of a chat response. Untagged: the wire shape is whichever variant
/// applies, `null` when there is nothing to attach.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatPayload {
    Task(Task),
    Conflict(ConflictReport),
    Drafts(Vec<TaskDraft>),
    None,
}

impl ChatPayload {
    pub fn to_value(&self) -> Option<serde_json::Value> {
        match self {
            Self::None => None,
            other => serde_json::to_value(other).ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutcome {
    pub action: AiAction,
    pub message: String,
    pub suggestions: Vec<String>,
    pub payload: ChatPayload,
}
