// file: src/pipeline/upload.rs
// description: end-to-end handling of one uploaded question paper
// reference: classify, render, then record the upload event

use crate::database::{Database, UploadLogRecorder};
use crate::error::Result;
use crate::models::UploadLogRecord;
use crate::report::{GeneratedReport, ReportBuilder, ReportTable};
use crate::session::SessionContext;
use crate::utils::Validator;
use tracing::info;

/// Result of a successful upload. Only `log` outlives the request.
#[derive(Debug, Clone)]
pub struct ProcessedUpload {
    pub table: ReportTable,
    pub xlsx: Option<Vec<u8>>,
    pub log: UploadLogRecord,
}

#[derive(Debug, Clone)]
pub struct UploadPipeline {
    db: Database,
    builder: ReportBuilder,
    max_upload_bytes: usize,
}

impl UploadPipeline {
    pub fn new(db: Database, max_upload_bytes: usize) -> Self {
        Self {
            db,
            builder: ReportBuilder::new(),
            max_upload_bytes,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Classify and render the spreadsheet. The upload is logged only after
    /// both succeed.
    pub fn process(
        &self,
        session: &SessionContext,
        filename: &str,
        content: &[u8],
    ) -> Result<ProcessedUpload> {
        self.run(session, filename, content, true)
    }

    /// Classify without rendering, for on-screen preview. Still logged.
    pub fn preview(
        &self,
        session: &SessionContext,
        filename: &str,
        content: &[u8],
    ) -> Result<ProcessedUpload> {
        self.run(session, filename, content, false)
    }

    fn run(
        &self,
        session: &SessionContext,
        filename: &str,
        content: &[u8],
        render: bool,
    ) -> Result<ProcessedUpload> {
        let (table, xlsx) = if render {
            let report = self.generate(content)?;
            (report.table, Some(report.xlsx))
        } else {
            self.check(content)?;
            (self.builder.build_from_bytes(content)?, None)
        };

        let log = self.record(session, filename)?;

        info!(
            "Processed '{}' for '{}': {} questions",
            log.filename,
            session.username,
            table.len()
        );

        Ok(ProcessedUpload { table, xlsx, log })
    }

    /// Validate and render without logging. Callers that persist the report
    /// themselves follow up with [`record`](Self::record).
    pub fn generate(&self, content: &[u8]) -> Result<GeneratedReport> {
        self.check(content)?;
        self.builder.generate(content)
    }

    /// Append the upload to the log under its sanitized file name.
    pub fn record(&self, session: &SessionContext, filename: &str) -> Result<UploadLogRecord> {
        let filename = Validator::sanitize_upload_filename(filename);
        UploadLogRecorder::new(&self.db).record(&session.username, &filename)
    }

    fn check(&self, content: &[u8]) -> Result<()> {
        Validator::validate_upload_size(content.len(), self.max_upload_bytes)?;
        Validator::validate_content_not_empty(content)
    }

    /// Admin-only view of every recorded upload.
    pub fn history(&self, session: &SessionContext) -> Result<Vec<UploadLogRecord>> {
        session.require_admin()?;
        UploadLogRecorder::new(&self.db).list()
    }
}
