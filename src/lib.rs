// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod classifier;
pub mod config;
pub mod database;
pub mod error;
pub mod exporter;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod server;
pub mod session;
pub mod utils;

pub use classifier::{BloomLevel, CourseOutcome, OutcomeMapper, TaxonomyClassifier};
pub use config::{Config, DatabaseConfig};
pub use database::{Database, SchemaManager, UploadLogRecorder, UserStore};
pub use error::{PipelineError, Result};
pub use exporter::{ExportManifest, JsonExporter, XlsxExporter};
pub use models::{Role, UploadLogRecord, User};
pub use pipeline::{
    BatchOptions, BatchOrchestrator, BatchStats, CsvScanner, ProgressTracker, UploadPipeline,
};
pub use report::{ReportBuilder, ReportTable};
pub use session::{AuthGateway, SessionContext, SessionRegistry, SessionState, View};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
