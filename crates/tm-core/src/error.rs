use thiserror::Error;
use tm_ai::AiFailure;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task not found")]
    NotFound,
    #[error("validation failed: {}", errors.join(", "))]
    Validation { errors: Vec<String> },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("validation failed: {}", errors.join(", "))]
    Validation { errors: Vec<String> },
    #[error("storage error: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message is required")]
    EmptyMessage,
    #[error("message must be at most {max} characters")]
    MessageTooLong { max: usize },
    #[error("invalid intent: {value}")]
    InvalidIntent { value: String },
}

#[derive(Debug, Error)]
pub enum TaskmateError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Generator(#[from] AiFailure),
    #[error("internal error: {message}")]
    Internal { message: String },
}
