// file: src/pipeline/scanner.rs
// description: discovery of question paper csv files for batch classification
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub stem: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CsvScanner {
    max_file_size: Option<u64>,
}

impl CsvScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_file_size(max_bytes: u64) -> Self {
        Self {
            max_file_size: Some(max_bytes),
        }
    }

    /// Expand a mix of files and directories into CSV inputs. Explicit files
    /// must carry a `.csv` extension; directories are walked recursively.
    pub fn scan(&self, inputs: &[PathBuf]) -> Result<Vec<ScannedFile>> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_dir() {
                files.extend(self.scan_directory(input)?);
            } else {
                Validator::validate_file_path(input)?;
                Validator::validate_csv_extension(input)?;
                files.push(self.describe(input)?);
            }
        }

        info!("Found {} CSV files", files.len());
        Ok(files)
    }

    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        debug!("Scanning directory: {}", root.display());
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if Validator::validate_csv_extension(path).is_err() {
                continue;
            }

            let scanned = self.describe(path)?;
            if let Some(max) = self.max_file_size
                && scanned.size > max
            {
                debug!("Skipping large file ({} bytes): {}", scanned.size, path.display());
                continue;
            }

            files.push(scanned);
        }

        Ok(files)
    }

    fn describe(&self, path: &Path) -> Result<ScannedFile> {
        let metadata = path.metadata().map_err(|e| {
            PipelineError::Validation(format!("Cannot stat {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "report".to_string());

        Ok(ScannedFile {
            path: path.to_path_buf(),
            file_name,
            stem,
            size: metadata.len(),
        })
    }
}
