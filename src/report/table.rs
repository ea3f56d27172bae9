// file: src/report/table.rs
// description: annotated report table produced for one uploaded question paper
// reference: internal data structures

use serde::Serialize;

/// One input row with its derived labels. `cells` is aligned with the
/// owning table's headers and already contains both labels. Serializes as
/// a plain array of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportRow {
    pub cells: Vec<String>,
    #[serde(skip)]
    pub bloom_level: &'static str,
    #[serde(skip)]
    pub matched_co: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<ReportRow>,
    #[serde(skip)]
    question_index: usize,
}

impl ReportTable {
    pub(crate) fn new(headers: Vec<String>, question_index: usize) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            question_index,
        }
    }

    pub(crate) fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn question(&self, row: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(self.question_index))
            .map(String::as_str)
    }

    /// Values of one named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.cells.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}
