use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json column encode failed: {message}")]
    Encode { message: String },
    #[error("json column decode failed: {message}")]
    Decode { message: String },
    #[error("invalid enum value: {value}")]
    Enum { value: String },
    #[error("invalid timestamp: {value}")]
    Timestamp { value: String },
}

pub fn ts_to_sql(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub fn ts_from_sql(value: &str) -> Result<DateTime<Utc>, CodecError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| CodecError::Timestamp {
            value: value.to_string(),
        })
}

pub fn json_to_sql<T: Serialize>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(|err| CodecError::Encode {
        message: err.to_string(),
    })
}

pub fn json_from_sql<T: DeserializeOwned>(value: &str) -> Result<T, CodecError> {
    serde_json::from_str(value).map_err(|err| CodecError::Decode {
        message: err.to_string(),
    })
}

/// Enums are stored as their serde string form, so wire spellings like
/// "In Progress" round-trip through the column unchanged.
pub fn enum_to_sql<T: Serialize>(value: &T) -> Result<String, CodecError> {
    match serde_json::to_value(value).map_err(|err| CodecError::Encode {
        message: err.to_string(),
    })? {
        Value::String(text) => Ok(text),
        other => Err(CodecError::Enum {
            value: other.to_string(),
        }),
    }
}

pub fn enum_from_sql<T: DeserializeOwned>(value: &str) -> Result<T, CodecError> {
    serde_json::from_value(Value::String(value.to_string())).map_err(|_| CodecError::Enum {
        value: value.to_string(),
    })
}
