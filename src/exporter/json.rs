// file: src/exporter/json.rs
// description: json export of report tables and batch manifests

use crate::error::Result;
use crate::report::ReportTable;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_reports: usize,
    pub total_questions: usize,
    pub files: Vec<String>,
}

impl ExportManifest {
    pub fn new() -> Self {
        Self {
            exported_at: Utc::now().to_rfc3339(),
            total_reports: 0,
            total_questions: 0,
            files: vec![],
        }
    }

    pub fn record(&mut self, file: impl Into<String>, questions: usize) {
        self.total_reports += 1;
        self.total_questions += questions;
        self.files.push(file.into());
    }
}

impl Default for ExportManifest {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn render(table: &ReportTable, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(table)?
        } else {
            serde_json::to_string(table)?
        };
        Ok(json)
    }

    pub fn export_report(&self, stem: &str, table: &ReportTable, pretty: bool) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}_CO_Blooms_Report.json", stem));
        fs::write(&path, Self::render(table, pretty)?)?;
        info!("Exported {} rows to {}", table.len(), path.display());
        Ok(path)
    }

    pub fn export_manifest(&self, manifest: &ExportManifest) -> Result<PathBuf> {
        let path = self.output_dir.join("manifest.json");
        fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
        info!(
            "Export complete: {} reports, {} questions",
            manifest.total_reports, manifest.total_questions
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportBuilder;
    use tempfile::tempdir;

    fn table() -> ReportTable {
        ReportBuilder::new()
            .build("Question\nExplain paging\n".as_bytes())
            .unwrap()
    }

    #[test]
    fn test_exporter_creation() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path().join("nested"));
        assert!(exporter.is_ok());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_render_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&JsonExporter::render(&table(), false).unwrap()).unwrap();

        assert_eq!(json["headers"][1], "Bloom's Level");
        assert_eq!(json["rows"][0][0], "Explain paging");
        assert_eq!(json["rows"][0][1], "Understand");
        assert_eq!(json["rows"][0][2], "CO2");
        assert!(json.get("question_index").is_none());
    }

    #[test]
    fn test_export_report_and_manifest() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path()).unwrap();

        let path = exporter.export_report("quiz1", &table(), true).unwrap();
        assert!(path.ends_with("quiz1_CO_Blooms_Report.json"));

        let mut manifest = ExportManifest::new();
        manifest.record(path.display().to_string(), 1);
        let manifest_path = exporter.export_manifest(&manifest).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(manifest_path).unwrap()).unwrap();
        assert_eq!(written["total_reports"], 1);
        assert_eq!(written["total_questions"], 1);
    }
}
