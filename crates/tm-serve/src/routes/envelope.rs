use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tm_ai::AiAction;
use utoipa::ToSchema;

/// Uniform wrapper returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: Option<Value>,
    #[schema(value_type = Object)]
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl Envelope {
    pub fn success(data: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            details,
            timestamp: Utc::now(),
        }
    }
}

/// Chat responses flatten `suggestions` and `action` alongside the
/// envelope fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatEnvelope {
    pub suggestions: Vec<String>,
    pub action: AiAction,
    #[serde(flatten)]
    pub envelope: Envelope,
}

pub fn to_data<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}
