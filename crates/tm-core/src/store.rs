use crate::conversations::ConversationRepository;
use crate::tasks::TaskRepository;

/// Handle to the per-user document store. Accessors hand out short-lived
/// repositories; nothing is cached between calls, so every request sees a
/// fresh snapshot.
pub trait Store {
    type Tasks<'a>: TaskRepository
    where
        Self: 'a;
    type Conversations<'a>: ConversationRepository
    where
        Self: 'a;

    fn tasks(&self) -> Self::Tasks<'_>;
    fn conversations(&self) -> Self::Conversations<'_>;
}
