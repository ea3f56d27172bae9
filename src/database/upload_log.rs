// file: src/database/upload_log.rs
// description: append-only log of processed uploads
// reference: https://docs.rs/rusqlite

use crate::database::client::Database;
use crate::error::Result;
use crate::models::UploadLogRecord;
use rusqlite::params;
use tracing::debug;

pub struct UploadLogRecorder<'a> {
    db: &'a Database,
}

impl<'a> UploadLogRecorder<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Stamp the upload with the current local time and append it.
    pub fn record(&self, username: &str, filename: &str) -> Result<UploadLogRecord> {
        let record = UploadLogRecord::new(username, filename);
        self.append(&record)?;
        Ok(record)
    }

    pub fn append(&self, record: &UploadLogRecord) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO upload_logs (username, timestamp, filename) VALUES (?1, ?2, ?3)",
                params![record.username, record.timestamp, record.filename],
            )?;
            Ok(())
        })?;

        debug!(
            "Logged upload of '{}' by '{}' at {}",
            record.filename, record.username, record.timestamp
        );
        Ok(())
    }

    /// Full history in insertion order.
    pub fn list(&self) -> Result<Vec<UploadLogRecord>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, timestamp, filename FROM upload_logs ORDER BY rowid",
            )?;
            let records = stmt
                .query_map([], |row| {
                    Ok(UploadLogRecord {
                        username: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                        timestamp: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        filename: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }
}
