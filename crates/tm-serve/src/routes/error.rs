use crate::routes::envelope::Envelope;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tm_core::error::{ChatError, ConversationError, TaskError, TaskmateError};

/// Single place where the error taxonomy becomes HTTP. `non_production`
/// gates whether internal detail leaks into the response body.
pub fn map_error(err: &TaskmateError, non_production: bool) -> (StatusCode, Json<Envelope>) {
    let (status, envelope) = match err {
        TaskmateError::Task(task) => map_task_error(task, non_production),
        TaskmateError::Conversation(conversation) => {
            map_conversation_error(conversation, non_production)
        }
        TaskmateError::Chat(chat) => map_chat_error(chat),
        TaskmateError::Generator(failure) => {
            let status = match failure.status_code() {
                429 => StatusCode::TOO_MANY_REQUESTS,
                503 => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            (
                status,
                Envelope::error(
                    failure.message.clone(),
                    Some(json!({ "suggestions": failure.suggestions })),
                ),
            )
        }
        TaskmateError::Internal { message } => internal(message, non_production),
    };
    (status, Json(envelope))
}

fn map_task_error(err: &TaskError, non_production: bool) -> (StatusCode, Envelope) {
    match err {
        TaskError::NotFound => (
            StatusCode::NOT_FOUND,
            Envelope::error("Task not found", None),
        ),
        TaskError::Validation { errors } => (
            StatusCode::BAD_REQUEST,
            Envelope::error("Validation failed", Some(json!({ "errors": errors }))),
        ),
        TaskError::InvalidInput { .. } => {
            (StatusCode::BAD_REQUEST, Envelope::error(err.to_string(), None))
        }
        TaskError::Storage { message } => internal(message, non_production),
    }
}

fn map_conversation_error(
    err: &ConversationError,
    non_production: bool,
) -> (StatusCode, Envelope) {
    match err {
        ConversationError::Validation { errors } => (
            StatusCode::BAD_REQUEST,
            Envelope::error("Validation failed", Some(json!({ "errors": errors }))),
        ),
        ConversationError::Storage { message } => internal(message, non_production),
    }
}

fn map_chat_error(err: &ChatError) -> (StatusCode, Envelope) {
    let message = match err {
        ChatError::EmptyMessage => "Message is required".to_string(),
        ChatError::MessageTooLong { .. } | ChatError::InvalidIntent { .. } => err.to_string(),
    };
    (StatusCode::BAD_REQUEST, Envelope::error(message, None))
}

fn internal(message: &str, non_production: bool) -> (StatusCode, Envelope) {
    tracing::error!(message, "request failed");
    let details = non_production.then(|| json!(message));
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Envelope::error("Internal Server Error", details),
    )
}
