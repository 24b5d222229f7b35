use crate::types::enums::TurnKind;
use crate::types::ids::{ConversationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One recorded turn of a user/assistant exchange. Append-only: turns are
/// never mutated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub id: ConversationId,
    pub user_id: UserId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TurnKind,
    /// Opaque structured payload attached to assistant turns (parsed
    /// generator output, task diffs). Not interpreted on read.
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
}
