// file: src/exporter/xlsx.rs
// description: spreadsheet rendering of classified report tables
// reference: https://docs.rs/rust_xlsxwriter

use crate::error::{PipelineError, Result};
use crate::report::{BLOOM_COLUMN, CO_COLUMN, REPORT_FILE_NAME, ReportTable, SHEET_NAME};
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Longest string, in characters, a single XLSX cell accepts.
pub const MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, Clone)]
pub struct XlsxExporter {
    sheet_name: String,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            sheet_name: SHEET_NAME.to_string(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Serialize the table to an in-memory workbook with a single sheet.
    /// Header row first, no index column.
    pub fn to_bytes(&self, table: &ReportTable) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let text_columns: Vec<usize> = [
            Some(table.question_index()),
            table.column_index(BLOOM_COLUMN),
            table.column_index(CO_COLUMN),
        ]
        .into_iter()
        .flatten()
        .collect();

        {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&self.sheet_name)?;

            for (col, header) in table.headers.iter().enumerate() {
                let header = fit_cell(header, 0, col);
                worksheet.write_string_with_format(0, column_number(col)?, header, &header_format)?;
            }

            for (idx, row) in table.rows.iter().enumerate() {
                let row_num = u32::try_from(idx + 1).map_err(|_| {
                    PipelineError::Validation("report has too many rows".to_string())
                })?;

                for (col, value) in row.cells.iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }

                    let col_num = column_number(col)?;
                    match numeric_cell(value) {
                        Some(number) if !text_columns.contains(&col) => {
                            worksheet.write_number(row_num, col_num, number)?;
                        }
                        _ => {
                            let value = fit_cell(value, idx + 1, col);
                            worksheet.write_string(row_num, col_num, value)?;
                        }
                    }
                }
            }
        }

        let bytes = workbook.save_to_buffer()?;
        debug!(
            "Rendered {} rows to '{}' ({} bytes)",
            table.len(),
            self.sheet_name,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Write the report into `output_dir`, named after `stem` when given.
    pub fn write_to_dir(
        &self,
        table: &ReportTable,
        output_dir: &Path,
        stem: Option<&str>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;

        let file_name = match stem {
            Some(stem) => format!("{}_{}", stem, REPORT_FILE_NAME),
            None => REPORT_FILE_NAME.to_string(),
        };
        let path = output_dir.join(file_name);

        fs::write(&path, self.to_bytes(table)?)?;
        info!("Wrote report to {}", path.display());
        Ok(path)
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn column_number(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| PipelineError::Validation("report has too many columns".to_string()))
}

// Oversized text is cut to the cell limit rather than failing the report.
fn fit_cell(value: &str, row: usize, col: usize) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(
                "Truncated cell at row {}, column {} to {} characters",
                row + 1,
                col + 1,
                MAX_CELL_CHARS
            );
            &value[..end]
        }
        None => value,
    }
}

fn numeric_cell(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}
