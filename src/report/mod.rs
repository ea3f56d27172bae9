// file: src/report/mod.rs
// description: report building module exports and column constants
// reference: internal module structure

pub mod builder;
pub mod table;

pub use builder::{GeneratedReport, ReportBuilder};
pub use table::{ReportRow, ReportTable};

pub const QUESTION_COLUMN: &str = "Question";
pub const BLOOM_COLUMN: &str = "Bloom's Level";
pub const CO_COLUMN: &str = "Matched CO";
pub const SHEET_NAME: &str = "CO Report";
pub const REPORT_FILE_NAME: &str = "CO_Blooms_Report.xlsx";
