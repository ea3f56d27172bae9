// file: src/models/upload_log.rs
// description: audit record for one processed upload
// reference: internal data structures

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLogRecord {
    pub username: String,
    pub timestamp: String,
    pub filename: String,
}

impl UploadLogRecord {
    pub fn new(username: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::at(username, Local::now().naive_local(), filename)
    }

    pub fn at(
        username: impl Into<String>,
        when: NaiveDateTime,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            timestamp: when.format(TIMESTAMP_FORMAT).to_string(),
            filename: filename.into(),
        }
    }
}
