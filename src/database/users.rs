// file: src/database/users.rs
// description: credential storage and lookup
// reference: https://docs.rs/rusqlite

use crate::database::client::Database;
use crate::error::{PipelineError, Result};
use crate::models::{Role, User};
use rusqlite::{ErrorCode, OptionalExtension, params};
use tracing::{debug, info};

pub struct UserStore<'a> {
    db: &'a Database,
}

impl<'a> UserStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Strict insert: an existing username is reported as `DuplicateUser`
    /// and the stored record is left untouched.
    pub fn insert(&self, username: &str, password: &str, role: Role) -> Result<()> {
        self.db.with_connection(|conn| {
            match conn.execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
                params![username, password, role.as_str()],
            ) {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Err(PipelineError::DuplicateUser(username.to_string()))
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    /// Adds a user, silently ignoring a username that already exists.
    /// Returns whether a new record was written.
    pub fn add_user(&self, username: &str, password: &str, role: Role) -> Result<bool> {
        match self.insert(username, password, role) {
            Ok(()) => {
                info!("Added {} user '{}'", role, username);
                Ok(true)
            }
            Err(PipelineError::DuplicateUser(_)) => {
                debug!("User '{}' already exists, keeping original record", username);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<Role>> {
        let role: Option<String> = self.db.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT role FROM users WHERE username = ?1 AND password = ?2",
                    params![username, password],
                    |row| row.get(0),
                )
                .optional()?)
        })?;

        role.map(|r| r.parse::<Role>()).transpose()
    }

    pub fn find(&self, username: &str) -> Result<Option<User>> {
        let role: Option<String> = self.db.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT role FROM users WHERE username = ?1",
                    params![username],
                    |row| row.get(0),
                )
                .optional()?)
        })?;

        role.map(|r| -> Result<User> {
            Ok(User {
                username: username.to_string(),
                role: r.parse()?,
            })
        })
        .transpose()
    }

    pub fn list(&self) -> Result<Vec<User>> {
        let rows: Vec<(String, String)> = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT username, role FROM users ORDER BY username")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        rows.into_iter()
            .map(|(username, role)| {
                Ok(User {
                    username,
                    role: role.parse()?,
                })
            })
            .collect()
    }
}
