use crate::error::TaskError;
use crate::types::ids::{TaskId, UserId};
use crate::types::io::{CreateTaskInput, UpdateTaskInput};
use crate::types::task::Task;

/// Per-user task persistence. Implementations scope every operation to
/// the given user; a cross-user read or write is never issued.
pub trait TaskRepository {
    fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError>;
    fn find_by_id(&self, user_id: &UserId, id: &TaskId) -> Result<Option<Task>, TaskError>;
    fn create(&self, input: CreateTaskInput) -> Result<Task, TaskError>;
    fn update(
        &self,
        user_id: &UserId,
        id: &TaskId,
        input: UpdateTaskInput,
    ) -> Result<Task, TaskError>;
    fn delete(&self, user_id: &UserId, id: &TaskId) -> Result<(), TaskError>;
}

/// Resolves a chat reference to a task: exact id match wins, then the
/// first case-insensitive substring match against titles.
pub fn find_by_identifier<'a>(tasks: &'a [Task], identifier: &str) -> Option<&'a Task> {
    let needle = identifier.trim();
    if needle.is_empty() {
        return None;
    }
    if let Some(task) = tasks.iter().find(|task| task.id.as_str() == needle) {
        return Some(task);
    }
    let lowered = needle.to_lowercase();
    tasks
        .iter()
        .find(|task| task.title.to_lowercase().contains(&lowered))
}
