// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod progress;
mod scanner;
mod upload;

pub use orchestrator::{BatchOptions, BatchOrchestrator, BatchSummary, FileReport};
pub use progress::{BatchStats, ProgressTracker};
pub use scanner::{CsvScanner, ScannedFile};
pub use upload::{ProcessedUpload, UploadPipeline};
