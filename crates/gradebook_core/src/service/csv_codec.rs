//! CSV row shapes and header rules for grade import/export.
//!
//! # Invariants
//! - Export header is exactly [`EXPORT_HEADER`], in that order.
//! - Import requires every column in [`REQUIRED_IMPORT_COLUMNS`]; other
//!   columns (`id`, `created_at`, unknown ones) are ignored.

use crate::model::grade::{GradeId, GradeRecord};
use csv::StringRecord;
use serde::Serialize;

/// Header written by export.
pub const EXPORT_HEADER: [&str; 6] = [
    "id",
    "student_no",
    "name",
    "subject",
    "score",
    "created_at",
];

/// Columns an imported file must provide. `student_no` is optional.
pub const REQUIRED_IMPORT_COLUMNS: [&str; 3] = ["name", "subject", "score"];

const UTF8_BOM: char = '\u{feff}';

/// One exported data row, in [`EXPORT_HEADER`] order.
#[derive(Debug, Serialize)]
pub(crate) struct ExportRow<'a> {
    id: GradeId,
    student_no: &'a str,
    name: &'a str,
    subject: &'a str,
    score: f64,
    created_at: &'a str,
}

impl<'a> From<&'a GradeRecord> for ExportRow<'a> {
    fn from(record: &'a GradeRecord) -> Self {
        Self {
            id: record.id,
            student_no: record.student_no.as_str(),
            name: record.name.as_str(),
            subject: record.subject.as_str(),
            score: record.score,
            created_at: record.created_at.as_str(),
        }
    }
}

/// Column positions resolved once from an import header.
///
/// When a name repeats, the last occurrence wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImportColumns {
    student_no: Option<usize>,
    name: usize,
    subject: usize,
    score: usize,
}

impl ImportColumns {
    /// Locates import columns in a raw header record.
    ///
    /// Names are matched after trimming, and a leading BOM on the first name
    /// is ignored.
    ///
    /// # Errors
    /// Returns the required columns that are absent, in declaration order.
    pub(crate) fn resolve(raw_headers: &StringRecord) -> Result<Self, Vec<&'static str>> {
        let headers = normalize_headers(raw_headers);
        let position = |column: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, name)| *name == column)
                .map(|(index, _)| index)
                .last()
        };

        let [name, subject, score] = REQUIRED_IMPORT_COLUMNS.map(position);
        match (name, subject, score) {
            (Some(name), Some(subject), Some(score)) => Ok(Self {
                student_no: position("student_no"),
                name,
                subject,
                score,
            }),
            _ => Err(REQUIRED_IMPORT_COLUMNS
                .iter()
                .zip([name, subject, score])
                .filter(|(_, found)| found.is_none())
                .map(|(column, _)| *column)
                .collect()),
        }
    }

    /// Reads one data record; cells past the end of a short row read as "".
    pub(crate) fn read<'r>(&self, record: &'r StringRecord) -> ImportedRow<'r> {
        let cell = move |index: usize| record.get(index).unwrap_or("");
        ImportedRow {
            student_no: self.student_no.map_or("", cell),
            name: cell(self.name),
            subject: cell(self.subject),
            score: cell(self.score),
        }
    }
}

/// Raw cells of one imported data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImportedRow<'r> {
    pub(crate) student_no: &'r str,
    pub(crate) name: &'r str,
    pub(crate) subject: &'r str,
    /// Kept raw; parsing happens in the validation step.
    pub(crate) score: &'r str,
}

fn normalize_headers(raw: &StringRecord) -> StringRecord {
    raw.iter()
        .enumerate()
        .map(|(index, name)| {
            let name = if index == 0 {
                name.trim_start_matches(UTF8_BOM)
            } else {
                name
            };
            name.trim()
        })
        .collect()
}
