// file: src/report/builder.rs
// description: applies both classifiers to every csv row and renders the report
// reference: https://docs.rs/csv

use crate::classifier::{OutcomeMapper, TaxonomyClassifier};
use crate::error::{PipelineError, Result};
use crate::exporter::XlsxExporter;
use crate::report::table::{ReportRow, ReportTable};
use crate::report::{BLOOM_COLUMN, CO_COLUMN, QUESTION_COLUMN};
use crate::utils::OperationTimer;
use csv::ReaderBuilder;
use std::io::Read;
use tracing::debug;

/// A classified table together with its spreadsheet rendering.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub table: ReportTable,
    pub xlsx: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    taxonomy: TaxonomyClassifier,
    outcomes: OutcomeMapper,
    exporter: XlsxExporter,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse CSV input and classify every row. Fails with `MissingColumn`
    /// before touching any row when the header lacks `Question`.
    pub fn build<R: Read>(&self, input: R) -> Result<ReportTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let mut headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let question_index = headers
            .iter()
            .position(|h| h == QUESTION_COLUMN)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: QUESTION_COLUMN.to_string(),
            })?;

        let input_width = headers.len();
        let bloom_index = derived_column(&mut headers, BLOOM_COLUMN);
        let co_index = derived_column(&mut headers, CO_COLUMN);

        let mut table = ReportTable::new(headers, question_index);

        for (line, record) in reader.records().enumerate() {
            let record = record?;

            if record.len() > input_width {
                return Err(PipelineError::Csv(format!(
                    "row {} has {} fields but the header has {}",
                    line + 1,
                    record.len(),
                    input_width
                )));
            }

            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            cells.resize(table.headers.len(), String::new());

            let question = cells[question_index].as_str();
            let bloom_level = self.taxonomy.classify(question);
            let matched_co = self.outcomes.map(question);

            cells[bloom_index] = bloom_level.to_string();
            cells[co_index] = matched_co.to_string();

            table.push(ReportRow {
                cells,
                bloom_level,
                matched_co,
            });
        }

        debug!("Classified {} questions", table.len());
        Ok(table)
    }

    pub fn build_from_bytes(&self, bytes: &[u8]) -> Result<ReportTable> {
        self.build(bytes)
    }

    pub fn render(&self, table: &ReportTable) -> Result<Vec<u8>> {
        self.exporter.to_bytes(table)
    }

    /// Classify and serialize in one pass. Nothing is rendered if
    /// classification fails.
    pub fn generate(&self, bytes: &[u8]) -> Result<GeneratedReport> {
        let timer = OperationTimer::new("report generation");
        let table = self.build_from_bytes(bytes)?;
        let xlsx = self.render(&table)?;
        timer.finish_with_count(table.len());
        Ok(GeneratedReport { table, xlsx })
    }
}

// An existing column of the same name is overwritten in place.
fn derived_column(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(idx) => idx,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
Question,Marks
List the main components of a CPU,2
Design a new algorithm for sorting,10
What is the capital of France?,1
";

    #[test]
    fn test_build_appends_derived_columns() {
        let table = ReportBuilder::new().build(SAMPLE.as_bytes()).unwrap();

        assert_eq!(
            table.headers,
            vec!["Question", "Marks", "Bloom's Level", "Matched CO"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.rows[0].cells,
            vec!["List the main components of a CPU", "2", "Remember", "CO1"]
        );
        assert_eq!(table.rows[1].bloom_level, "Create");
        assert_eq!(table.rows[1].matched_co, "CO6");
        assert_eq!(table.rows[2].bloom_level, "Not Classified");
        assert_eq!(table.rows[2].matched_co, "CO Not Found");
    }

    #[test]
    fn test_preserves_row_order_and_passthrough_columns() {
        let csv = "Id,Question,Section\n3,Explain recursion,B\n1,Define a stack,A\n";
        let table = ReportBuilder::new().build(csv.as_bytes()).unwrap();

        assert_eq!(table.question_index(), 1);
        assert_eq!(table.column("Id").unwrap(), vec!["3", "1"]);
        assert_eq!(table.column("Section").unwrap(), vec!["B", "A"]);
        assert_eq!(
            table.column("Bloom's Level").unwrap(),
            vec!["Understand", "Remember"]
        );
        assert_eq!(table.column("Matched CO").unwrap(), vec!["CO2", "CO1"]);
    }

    #[test]
    fn test_missing_question_column() {
        let csv = "question,Marks\nDefine entropy,2\n";
        let err = ReportBuilder::new().build(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));

        let err = ReportBuilder::new().generate(b"").unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }

    #[test]
    fn test_header_only_input() {
        let table = ReportBuilder::new().build("Question\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers, vec!["Question", "Bloom's Level", "Matched CO"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "Marks,Question\n5\n";
        let table = ReportBuilder::new().build(csv.as_bytes()).unwrap();
        assert_eq!(table.rows[0].cells, vec!["5", "", "Not Classified", "CO Not Found"]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let csv = "Question\nDefine a,b\n";
        let err = ReportBuilder::new().build(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_)));
    }

    #[test]
    fn test_existing_derived_column_is_overwritten() {
        let csv = "Question,Matched CO,Notes\nSolve the equation,CO9,x\n";
        let table = ReportBuilder::new().build(csv.as_bytes()).unwrap();
        assert_eq!(
            table.headers,
            vec!["Question", "Matched CO", "Notes", "Bloom's Level"]
        );
        assert_eq!(table.rows[0].cells, vec!["Solve the equation", "CO3", "x", "Apply"]);
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "Question\n\"Compare A, B and C\"\n";
        let table = ReportBuilder::new().build(csv.as_bytes()).unwrap();
        assert_eq!(table.question(0), Some("Compare A, B and C"));
        assert_eq!(table.rows[0].bloom_level, "Analyze");
        assert_eq!(table.rows[0].matched_co, "CO4");
    }

    #[test]
    fn test_bom_header_is_accepted() {
        let csv = "\u{feff}Question,Marks\nDefine a heap,2\n";
        let table = ReportBuilder::new().build(csv.as_bytes()).unwrap();
        assert_eq!(
            table.headers,
            vec!["Question", "Marks", "Bloom's Level", "Matched CO"]
        );
        assert_eq!(table.rows[0].bloom_level, "Remember");
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let csv: &[u8] = b"Question\nD\xe9finir un arbre\n";
        let err = ReportBuilder::new().build(csv).unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_)));
    }

    #[test]
    fn test_generate_produces_workbook() {
        let report = ReportBuilder::new().generate(SAMPLE.as_bytes()).unwrap();
        assert_eq!(report.table.len(), 3);
        assert_eq!(&report.xlsx[..2], b"PK");
    }
}
