use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Health,
    Education,
    Shopping,
    Travel,
    Entertainment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

/// Generator output is not reliable about casing, so lowercase spellings
/// are accepted alongside the canonical ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum RecurrenceKind {
    #[default]
    #[serde(alias = "none")]
    None,
    #[serde(alias = "daily")]
    Daily,
    #[serde(alias = "weekly")]
    Weekly,
    #[serde(alias = "monthly")]
    Monthly,
    #[serde(alias = "yearly")]
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    CreateRoutine,
    ImproveRoutine,
    Query,
}

impl ChatIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateRoutine => "create_routine",
            Self::ImproveRoutine => "improve_routine",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for ChatIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChatIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_routine" => Ok(Self::CreateRoutine),
            "improve_routine" => Ok(Self::ImproveRoutine),
            "query" => Ok(Self::Query),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_spelling_matches_store() {
        let encoded = serde_json::to_value(TaskStatus::InProgress).unwrap();
        assert_eq!(encoded, serde_json::json!("In Progress"));
    }

    #[test]
    fn recurrence_accepts_lowercase_aliases() {
        let kind: RecurrenceKind = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(kind, RecurrenceKind::Daily);
    }

    #[test]
    fn intent_parses_known_values_only() {
        assert_eq!(ChatIntent::from_str("query"), Ok(ChatIntent::Query));
        assert!(ChatIntent::from_str("delete_everything").is_err());
    }
}
