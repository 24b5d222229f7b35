pub mod generator;
pub mod http;
pub mod reply;

pub use generator::{Generator, GeneratorError};
pub use http::HttpGenerator;
pub use reply::{generate_reply, parse_reply, AiAction, AiFailure, AiFaultKind, AiMessage};
