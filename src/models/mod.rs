// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod upload_log;
pub mod user;

pub use upload_log::{TIMESTAMP_FORMAT, UploadLogRecord};
pub use user::{Role, User};
