// file: src/pipeline/orchestrator.rs
// description: coordinates batch classification of csv files into report spreadsheets
// reference: bounded concurrent processing with blocking workers

use crate::error::Result;
use crate::exporter::{ExportManifest, JsonExporter};
use crate::pipeline::progress::{BatchStats, ProgressTracker};
use crate::pipeline::scanner::ScannedFile;
use crate::pipeline::upload::UploadPipeline;
use crate::report::{GeneratedReport, REPORT_FILE_NAME, ReportBuilder};
use crate::session::SessionContext;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub parallel_workers: usize,
    pub export_json: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: PathBuf,
    pub report_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub questions: usize,
}

#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub stats: BatchStats,
    pub reports: Vec<FileReport>,
    pub manifest: Option<PathBuf>,
}

/// Records each classified file as an upload by `session`.
#[derive(Debug, Clone)]
struct UploadAttribution {
    pipeline: UploadPipeline,
    session: SessionContext,
}

#[derive(Debug, Clone)]
struct Worker {
    builder: ReportBuilder,
    options: BatchOptions,
    json: Option<JsonExporter>,
    attribution: Option<UploadAttribution>,
}

pub struct BatchOrchestrator {
    worker: Arc<Worker>,
    max_concurrent_tasks: usize,
}

impl BatchOrchestrator {
    pub fn new(options: BatchOptions) -> Result<Self> {
        fs::create_dir_all(&options.output_dir)?;

        let json = if options.export_json {
            Some(JsonExporter::new(&options.output_dir)?)
        } else {
            None
        };
        let max_concurrent_tasks = options.parallel_workers.max(1);

        Ok(Self {
            worker: Arc::new(Worker {
                builder: ReportBuilder::new(),
                options,
                json,
                attribution: None,
            }),
            max_concurrent_tasks,
        })
    }

    pub fn with_upload_log(mut self, pipeline: UploadPipeline, session: SessionContext) -> Self {
        let mut worker = (*self.worker).clone();
        worker.attribution = Some(UploadAttribution { pipeline, session });
        self.worker = Arc::new(worker);
        self
    }

    pub async fn run(
        &self,
        files: Vec<ScannedFile>,
        progress: Arc<ProgressTracker>,
    ) -> Result<BatchSummary> {
        if files.is_empty() {
            warn!("No CSV files to classify");
            return Ok(BatchSummary {
                stats: BatchStats::new(),
                reports: Vec::new(),
                manifest: None,
            });
        }

        info!(
            "Classifying {} files with {} concurrent tasks",
            files.len(),
            self.max_concurrent_tasks
        );

        let jobs = assign_output_stems(files);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_tasks));

        let tasks = jobs.into_iter().map(|(file, stem)| {
            let semaphore = semaphore.clone();
            let worker = self.worker.clone();
            let progress = progress.clone();

            async move {
                let permit = semaphore.acquire_owned().await.ok()?;
                let source = file.path.clone();
                progress.set_message(file.file_name.clone());

                let processed =
                    tokio::task::spawn_blocking(move || worker.classify(&file, &stem)).await;
                drop(permit);

                match processed {
                    Ok(Ok(report)) => {
                        progress.inc_files_processed(report.questions);
                        Some(report)
                    }
                    Ok(Err(e)) => {
                        progress.inc_files_failed();
                        warn!("Failed to classify {}: {}", source.display(), e);
                        None
                    }
                    Err(e) => {
                        progress.inc_files_failed();
                        error!("Classification task panicked: {}", e);
                        None
                    }
                }
            }
        });

        let mut reports: Vec<FileReport> = stream::iter(tasks)
            .buffer_unordered(self.max_concurrent_tasks)
            .filter_map(|report| async move { report })
            .collect()
            .await;
        reports.sort_by(|a, b| a.source.cmp(&b.source));

        let manifest = self.write_manifest(&reports)?;

        let stats = progress.get_stats();
        progress.finish();
        log_final_stats(&stats);

        Ok(BatchSummary {
            stats,
            reports,
            manifest,
        })
    }

    fn write_manifest(&self, reports: &[FileReport]) -> Result<Option<PathBuf>> {
        let Some(json) = &self.worker.json else {
            return Ok(None);
        };

        let mut manifest = ExportManifest::new();
        for report in reports {
            manifest.record(report.report_path.display().to_string(), report.questions);
        }
        json.export_manifest(&manifest).map(Some)
    }
}

impl Worker {
    fn classify(&self, file: &ScannedFile, stem: &str) -> Result<FileReport> {
        let content = fs::read(&file.path)?;
        let GeneratedReport { table, xlsx } = match &self.attribution {
            Some(attr) => attr.pipeline.generate(&content)?,
            None => self.builder.generate(&content)?,
        };

        let report_path = self
            .options
            .output_dir
            .join(format!("{}_{}", stem, REPORT_FILE_NAME));
        fs::write(&report_path, xlsx)?;
        info!("Wrote report to {}", report_path.display());

        let json_path = match &self.json {
            Some(json) => Some(json.export_report(stem, &table, self.options.pretty_json)?),
            None => None,
        };

        // Logged only once the report is on disk.
        if let Some(attr) = &self.attribution {
            attr.pipeline.record(&attr.session, &file.file_name)?;
        }

        Ok(FileReport {
            source: file.path.clone(),
            report_path,
            json_path,
            questions: table.len(),
        })
    }
}

/// Same-named inputs from different directories get `_2`, `_3`, ... suffixes.
fn assign_output_stems(files: Vec<ScannedFile>) -> Vec<(ScannedFile, String)> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    files
        .into_iter()
        .map(|file| {
            let count = seen.entry(file.stem.clone()).or_insert(0);
            *count += 1;
            let stem = if *count == 1 {
                file.stem.clone()
            } else {
                format!("{}_{}", file.stem, count)
            };
            (file, stem)
        })
        .collect()
}

fn log_final_stats(stats: &BatchStats) {
    info!("=== Classification Summary ===");
    info!("Duration: {:.2} seconds", stats.duration_secs);
    info!("Files processed: {}", stats.files_processed);
    info!("Files failed: {}", stats.files_failed);
    info!("Questions classified: {}", stats.questions_classified);
    info!("Questions/second: {:.1}", stats.questions_per_second());
    info!("Success rate: {:.1}%", stats.success_rate());
}
