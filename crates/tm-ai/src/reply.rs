//! Defensive normalization of generator replies.
//!
//! The completion endpoint is prompted for a single JSON object but in
//! practice wraps it in code fences, surrounds it with prose, or returns
//! something else entirely. Everything that comes back is funneled into
//! either a validated [`AiMessage`] or a typed [`AiFailure`] — callers
//! never see a raw parse error.

use crate::generator::{Generator, GeneratorError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AiAction {
    CreateTask,
    UpdateTask,
    Query,
    ConflictResolution,
    Error,
}

impl AiAction {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "create_task" => Some(Self::CreateTask),
            "update_task" => Some(Self::UpdateTask),
            "query" => Some(Self::Query),
            "conflict_resolution" => Some(Self::ConflictResolution),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// A generator reply that survived validation. `task_data` stays as raw
/// JSON values; the domain layer decodes them into typed drafts.
#[derive(Debug, Clone, PartialEq)]
pub struct AiMessage {
    pub action: AiAction,
    pub task_data: Vec<Value>,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiFaultKind {
    /// Reply text is not even JSON-shaped.
    NotJson,
    /// JSON-shaped but failed to parse.
    Syntax,
    /// Parsed but a field has the wrong shape.
    BadShape,
    /// Parsed but a required field is absent or empty.
    MissingField,
    /// Well-formed reply in which the model itself declared failure.
    Declined,
    RateLimited,
    Unavailable,
}

/// Normalized failure with a stable status code, so the HTTP layer never
/// re-inspects what went wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AiFailure {
    pub kind: AiFaultKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl AiFailure {
    fn format(kind: AiFaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestions: vec![
                "Try rephrasing your request".to_string(),
                "Include date and time details".to_string(),
            ],
        }
    }

    pub fn bad_shape(message: impl Into<String>) -> Self {
        Self::format(AiFaultKind::BadShape, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::format(
            AiFaultKind::MissingField,
            format!("generator reply is missing required field '{field}'"),
        )
    }

    /// Content-shape faults are the caller's 422; transport faults keep
    /// their conventional statuses. Never a 5xx for bad content.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            AiFaultKind::NotJson
            | AiFaultKind::Syntax
            | AiFaultKind::BadShape
            | AiFaultKind::MissingField
            | AiFaultKind::Declined => 422,
            AiFaultKind::RateLimited => 429,
            AiFaultKind::Unavailable => 503,
        }
    }
}

impl From<GeneratorError> for AiFailure {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::RateLimited => Self {
                kind: AiFaultKind::RateLimited,
                message: "The assistant is handling too many requests right now".to_string(),
                suggestions: vec!["Wait a moment and try again".to_string()],
            },
            GeneratorError::Unavailable { message } => Self {
                kind: AiFaultKind::Unavailable,
                message: format!("The assistant is temporarily unavailable: {message}"),
                suggestions: vec!["Wait a moment and try again".to_string()],
            },
            GeneratorError::BadPayload { message } => Self::format(AiFaultKind::BadShape, message),
        }
    }
}

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fence pattern is valid")
    })
}

/// Pulls the JSON body out of the reply text. Prefers an explicit fenced
/// block (the model often adds prose around it); falls back to stripping
/// bare fence markers, then to the trimmed text itself.
fn extract_json_body(raw: &str) -> String {
    if let Some(captures) = fenced_json().captures(raw) {
        return captures[1].trim().to_string();
    }
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    {
        return inner.trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Parses one raw reply into a validated message. Fails closed: every
/// malformed reply maps to an [`AiFailure`], never a panic or a raw
/// `serde_json` error.
pub fn parse_reply(raw: &str) -> Result<AiMessage, AiFailure> {
    let body = extract_json_body(raw);
    if !(body.starts_with('{') && body.ends_with('}')) {
        return Err(AiFailure::format(
            AiFaultKind::NotJson,
            "generator reply is not valid JSON format",
        ));
    }

    let value: Value = serde_json::from_str(&body).map_err(|err| {
        AiFailure::format(AiFaultKind::Syntax, format!("generator reply failed to parse: {err}"))
    })?;
    let Some(object) = value.as_object() else {
        return Err(AiFailure::bad_shape("generator reply is not a JSON object"));
    };

    let message = object
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AiFailure::missing_field("message"))?
        .to_string();

    let action_text = object
        .get("action")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AiFailure::missing_field("action"))?;
    let action = AiAction::parse(action_text)
        .ok_or_else(|| AiFailure::bad_shape(format!("unknown action '{action_text}'")))?;

    let suggestions = string_list(object.get("suggestions"));

    // The model declaring failure is still a failure for the caller, with
    // the model's own phrasing carried through.
    if action == AiAction::Error {
        let mut failure = AiFailure::format(AiFaultKind::Declined, message);
        if !suggestions.is_empty() {
            failure.suggestions = suggestions;
        }
        return Err(failure);
    }

    let task_data = match object.get("task_data").or_else(|| object.get("taskData")) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(_) => {
            return Err(AiFailure::bad_shape(
                "task_data must be an array of task objects",
            ))
        }
    };

    Ok(AiMessage {
        action,
        task_data,
        message,
        suggestions,
    })
}

/// One full round: call the generator, then normalize whatever came back.
pub async fn generate_reply(
    generator: &dyn Generator,
    prompt: &str,
) -> Result<AiMessage, AiFailure> {
    let text = generator.generate(prompt).await.map_err(AiFailure::from)?;
    parse_reply(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json_reply() {
        let reply = parse_reply("```json\n{\"action\":\"query\",\"message\":\"hi\"}\n```").unwrap();
        assert_eq!(reply.action, AiAction::Query);
        assert_eq!(reply.message, "hi");
        assert!(reply.task_data.is_empty());
        assert!(reply.suggestions.is_empty());
    }

    #[test]
    fn extracts_fenced_json_surrounded_by_prose() {
        let raw = "Sure, here is the plan:\n```json\n{\"action\":\"query\",\"message\":\"ok\"}\n```\nLet me know!";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.message, "ok");
    }

    #[test]
    fn strips_bare_fences() {
        let reply =
            parse_reply("```\n{\"action\":\"update_task\",\"message\":\"done\"}\n```").unwrap();
        assert_eq!(reply.action, AiAction::UpdateTask);
    }

    #[test]
    fn free_text_fails_closed_with_suggestions() {
        let err = parse_reply("I could not understand the request, sorry.").unwrap_err();
        assert_eq!(err.kind, AiFaultKind::NotJson);
        assert_eq!(err.status_code(), 422);
        assert!(!err.suggestions.is_empty());
    }

    #[test]
    fn broken_json_is_a_syntax_fault() {
        let err = parse_reply("{\"action\":\"query\",\"message\"}").unwrap_err();
        assert_eq!(err.kind, AiFaultKind::Syntax);
    }

    #[test]
    fn missing_action_is_rejected() {
        let err = parse_reply("{\"message\":\"ok\"}").unwrap_err();
        assert_eq!(err.kind, AiFaultKind::MissingField);
    }

    #[test]
    fn empty_message_is_rejected() {
        let err = parse_reply("{\"action\":\"query\",\"message\":\"  \"}").unwrap_err();
        assert_eq!(err.kind, AiFaultKind::MissingField);
    }

    #[test]
    fn single_object_task_data_is_rejected() {
        let err = parse_reply(
            "{\"action\":\"create_task\",\"message\":\"ok\",\"task_data\":{\"title\":\"Gym\"}}",
        )
        .unwrap_err();
        assert_eq!(err.kind, AiFaultKind::BadShape);
    }

    #[test]
    fn array_task_data_is_kept_verbatim() {
        let reply = parse_reply(
            "{\"action\":\"create_task\",\"message\":\"ok\",\"taskData\":[{\"title\":\"Gym\"}]}",
        )
        .unwrap();
        assert_eq!(reply.task_data.len(), 1);
        assert_eq!(reply.task_data[0]["title"], "Gym");
    }

    #[test]
    fn model_declared_error_fails_with_model_phrasing() {
        let err = parse_reply(
            "{\"action\":\"error\",\"message\":\"I could not parse that\",\"suggestions\":[\"Add a date\"]}",
        )
        .unwrap_err();
        assert_eq!(err.kind, AiFaultKind::Declined);
        assert_eq!(err.message, "I could not parse that");
        assert_eq!(err.suggestions, vec!["Add a date".to_string()]);
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err =
            parse_reply("{\"action\":\"obliterate\",\"message\":\"ok\"}").unwrap_err();
        assert_eq!(err.kind, AiFaultKind::BadShape);
    }

    struct Canned(&'static str);

    #[async_trait::async_trait]
    impl Generator for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn generate_reply_normalizes_the_full_round() {
        let canned = Canned("```json\n{\"action\":\"query\",\"message\":\"hello\"}\n```");
        let reply = generate_reply(&canned, "prompt").await.unwrap();
        assert_eq!(reply.action, AiAction::Query);
        assert_eq!(reply.message, "hello");
    }

    #[test]
    fn transport_faults_keep_their_statuses() {
        let rate: AiFailure = GeneratorError::RateLimited.into();
        assert_eq!(rate.status_code(), 429);
        let down: AiFailure = GeneratorError::Unavailable {
            message: "connection refused".to_string(),
        }
        .into();
        assert_eq!(down.status_code(), 503);
        assert!(!down.suggestions.is_empty());
    }
}
