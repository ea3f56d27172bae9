// file: src/database/schema.rs
// description: SQLite schema management for users and upload logs
// reference: https://docs.rs/rusqlite

use crate::database::client::Database;
use crate::error::Result;
use tracing::{info, warn};

pub const USERS_TABLE: &str = "users";
pub const UPLOAD_LOGS_TABLE: &str = "upload_logs";

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password TEXT NOT NULL,
    role TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS upload_logs (
    username TEXT,
    timestamp TEXT,
    filename TEXT
);";

pub struct SchemaManager<'a> {
    db: &'a Database,
}

impl<'a> SchemaManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn initialize(&self) -> Result<()> {
        info!("Initializing SQLite schema");
        self.db.with_connection(|conn| {
            conn.execute_batch(CREATE_TABLES)?;
            Ok(())
        })?;
        info!("SQLite schema initialized successfully");
        Ok(())
    }

    pub fn verify_schema(&self) -> Result<bool> {
        for table_name in [USERS_TABLE, UPLOAD_LOGS_TABLE] {
            if !self.db.table_exists(table_name)? {
                warn!("Table '{}' does not exist", table_name);
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn drop_all_tables(&self) -> Result<()> {
        warn!("Dropping all tables");
        self.db.with_connection(|conn| {
            conn.execute_batch(
                "DROP TABLE IF EXISTS upload_logs;
                 DROP TABLE IF EXISTS users;",
            )?;
            Ok(())
        })
    }
}
