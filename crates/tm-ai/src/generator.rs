use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failures talking to the completion endpoint. Content
/// shape problems live in [`crate::reply`]; this enum only covers getting
/// text back at all.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator rate limited")]
    RateLimited,
    #[error("generator unavailable: {message}")]
    Unavailable { message: String },
    #[error("malformed completion payload: {message}")]
    BadPayload { message: String },
}

/// A single-shot text completion backend. One prompt in, one free-form
/// reply out; no streaming, no multi-turn state.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}
