use rusqlite::{Connection, Result};
use std::path::{Path, PathBuf};

pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    let sql = include_str!("../migrations/0001_init.sql");
    conn.execute_batch(sql)?;
    Ok(())
}

pub fn open_and_migrate(path: &Path) -> Result<Connection> {
    let conn = open(path)?;
    migrate(&conn)?;
    Ok(conn)
}

/// Fresh migrated database under the system temp directory. Repositories
/// reopen the store by path on every call, so a plain in-memory database
/// would not survive between operations.
pub fn test_db_path() -> PathBuf {
    std::env::temp_dir().join(format!("taskmate-test-{}.db", ulid::Ulid::new()))
}
