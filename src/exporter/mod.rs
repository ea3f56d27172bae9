// file: src/exporter/mod.rs
// description: report export module exports
// reference: internal module structure

pub mod json;
pub mod xlsx;

pub use json::{ExportManifest, JsonExporter};
pub use xlsx::XlsxExporter;
