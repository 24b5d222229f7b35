use crate::error::ConversationError;
use crate::types::conversation::ConversationTurn;
use crate::types::ids::UserId;
use crate::types::io::CreateTurnInput;

/// Transcript window returned by [`ConversationRepository::recent_by_user`].
pub const RECENT_TURN_LIMIT: usize = 50;

/// Append-only transcript persistence, scoped per user like tasks.
pub trait ConversationRepository {
    /// The most recent [`RECENT_TURN_LIMIT`] turns, restored to
    /// chronological order before returning.
    fn recent_by_user(&self, user_id: &UserId) -> Result<Vec<ConversationTurn>, ConversationError>;
    fn create(&self, input: CreateTurnInput) -> Result<ConversationTurn, ConversationError>;
}
