// file: src/database/client.rs
// description: SQLite handle with scoped per-operation connections
// reference: https://docs.rs/rusqlite

use crate::config::DatabaseConfig;
use crate::error::Result;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Location of the store. No connection is held between operations: each
/// call to [`with_connection`](Database::with_connection) opens one and
/// drops it on every exit path.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        Self::at(&config.path)
    }

    pub fn at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        info!("Using SQLite database at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    pub fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connect()?;
        debug!("Opened connection to {}", self.path.display());
        op(&conn)
    }

    pub fn ping(&self) -> Result<bool> {
        self.with_connection(|conn| {
            let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
            Ok(one == 1)
        })
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        self.with_connection(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = ?1",
                [table_name],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ping_creates_file() {
        let dir = tempdir().unwrap();
        let db = Database::at(dir.path().join("nested/users.db")).unwrap();
        assert!(db.ping().unwrap());
        assert!(db.path().exists());
    }

    #[test]
    fn test_table_exists() {
        let dir = tempdir().unwrap();
        let db = Database::at(dir.path().join("users.db")).unwrap();
        assert!(!db.table_exists("users").unwrap());

        db.with_connection(|conn| {
            conn.execute_batch("CREATE TABLE users (username TEXT)")?;
            Ok(())
        })
        .unwrap();

        assert!(db.table_exists("users").unwrap());
    }
}
