use crate::conversation_repo::ConversationRepo;
use crate::schema;
use crate::task_repo::TaskRepo;
use std::path::PathBuf;
use tm_core::store::Store;

/// SQLite-backed store handle. Holds only the database path: each
/// repository call opens a fresh connection, so requests always read a
/// current snapshot and the handle stays cheap to share across an async
/// boundary.
pub struct DbStore {
    path: PathBuf,
}

impl DbStore {
    /// Opens (creating if needed) and migrates the database at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, rusqlite::Error> {
        let path = path.into();
        schema::open_and_migrate(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Store for DbStore {
    type Tasks<'a>
        = TaskRepo
    where
        Self: 'a;
    type Conversations<'a>
        = ConversationRepo
    where
        Self: 'a;

    fn tasks(&self) -> Self::Tasks<'_> {
        TaskRepo::new(self.path.clone())
    }

    fn conversations(&self) -> Self::Conversations<'_> {
        ConversationRepo::new(self.path.clone())
    }
}
