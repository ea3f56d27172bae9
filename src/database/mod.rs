// file: src/database/mod.rs
// description: database operations module exports
// reference: internal module structure

pub mod client;
pub mod schema;
pub mod upload_log;
pub mod users;

pub use client::Database;
pub use schema::SchemaManager;
pub use upload_log::UploadLogRecorder;
pub use users::UserStore;
