//! Grade use-case service.
//!
//! # Responsibility
//! - Validate raw form/file input before it reaches the store.
//! - Provide CRUD, search, stats and CSV import/export entry points.
//!
//! # Invariants
//! - Validation order is score (numeric, range), then `name`, then `subject`.
//! - The service never bypasses repository contracts.
//! - CSV import is not transactional across rows: rows before a failing row
//!   stay committed, and the failure reports how many were imported.

use crate::model::grade::{
    parse_score, GradeFields, GradeFilter, GradeId, GradeRecord, GradeValidationError,
};
use crate::model::stats::StatsSummary;
use crate::repo::grade_repo::{GradeRepository, RepoError};
use crate::service::csv_codec::{ExportRow, ImportColumns, EXPORT_HEADER, REQUIRED_IMPORT_COLUMNS};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for grade use-cases.
///
/// `Display` output is suitable for showing to the user directly.
#[derive(Debug)]
pub enum ServiceError {
    /// Input shape or range violation.
    Validation(GradeValidationError),
    /// Update was requested without a grade id.
    InvalidArgument(&'static str),
    /// Storage rejected a write that slipped past validation.
    ConstraintViolation(String),
    /// Import source does not exist.
    FileNotFound(PathBuf),
    /// Import header lacks required columns.
    Schema { missing: Vec<&'static str> },
    /// Import stopped at `row` (header is row 1) after `imported` rows.
    ImportRow {
        row: usize,
        imported: usize,
        source: Box<ServiceError>,
    },
    Csv(csv::Error),
    Io(std::io::Error),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::ConstraintViolation(message) => {
                write!(f, "grade rejected by storage constraint: {message}")
            }
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::Schema { missing } => write!(
                f,
                "CSV header must contain {} (optional: student_no); missing: {}",
                REQUIRED_IMPORT_COLUMNS.join(", "),
                missing.join(", ")
            ),
            Self::ImportRow { row, source, .. } => write!(f, "row {row} is invalid: {source}"),
            Self::Csv(err) => write!(f, "CSV error: {err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ImportRow { source, .. } => Some(source.as_ref()),
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidArgument(_)
            | Self::ConstraintViolation(_)
            | Self::FileNotFound(_)
            | Self::Schema { .. } => None,
        }
    }
}

impl From<GradeValidationError> for ServiceError {
    fn from(value: GradeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ConstraintViolation(message) => Self::ConstraintViolation(message),
            RepoError::InvalidArgument(message) => Self::InvalidArgument(message),
            other => Self::Repo(other),
        }
    }
}

impl From<csv::Error> for ServiceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Gatekeeper between raw input and a grade repository.
pub struct GradeService<R: GradeRepository> {
    repo: R,
}

impl<R: GradeRepository> GradeService<R> {
    /// Creates a service that owns the provided repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates raw input and inserts a new grade.
    ///
    /// # Errors
    /// - `Validation` for a non-numeric/out-of-range score or blank name/subject.
    /// - `ConstraintViolation` if storage still rejects the row.
    pub fn create_grade(
        &self,
        student_no: &str,
        name: &str,
        subject: &str,
        raw_score: &str,
    ) -> ServiceResult<GradeId> {
        let fields = validated_fields(student_no, name, subject, raw_score).map_err(|err| {
            warn!("event=grade_create module=service status=rejected reason=\"{err}\"");
            err
        })?;
        let id = self.repo.insert_grade(&fields)?;
        debug!("event=grade_create module=service status=ok grade_id={id}");
        Ok(id)
    }

    /// Validates raw input and replaces all business fields of `id`.
    ///
    /// An `id` with no matching row is accepted and changes nothing.
    ///
    /// # Errors
    /// - `InvalidArgument` when `id` is `None`.
    /// - `Validation` under the same rules as [`Self::create_grade`].
    pub fn update_grade(
        &self,
        id: Option<GradeId>,
        student_no: &str,
        name: &str,
        subject: &str,
        raw_score: &str,
    ) -> ServiceResult<()> {
        let fields = validated_fields(student_no, name, subject, raw_score).map_err(|err| {
            warn!("event=grade_update module=service status=rejected reason=\"{err}\"");
            err
        })?;
        self.repo.update_grade(id, &fields)?;
        debug!(
            "event=grade_update module=service status=ok grade_id={}",
            id.unwrap_or_default()
        );
        Ok(())
    }

    /// Deletes one grade. Unknown ids are a no-op.
    pub fn delete_grade(&self, id: GradeId) -> ServiceResult<()> {
        self.repo.delete_grade(id)?;
        debug!("event=grade_delete module=service status=ok grade_id={id}");
        Ok(())
    }

    pub fn get_grade(&self, id: GradeId) -> ServiceResult<Option<GradeRecord>> {
        Ok(self.repo.get_grade(id)?)
    }

    /// Searches by optional substring criteria; blank criteria are ignored.
    pub fn search(
        &self,
        student_no: Option<&str>,
        name: Option<&str>,
        subject: Option<&str>,
    ) -> ServiceResult<Vec<GradeRecord>> {
        let filter = GradeFilter::new(student_no, name, subject);
        Ok(self.repo.search_grades(&filter)?)
    }

    /// Returns every grade, newest first.
    pub fn all(&self) -> ServiceResult<Vec<GradeRecord>> {
        Ok(self.repo.all_grades()?)
    }

    pub fn stats(&self) -> ServiceResult<StatsSummary> {
        Ok(self.repo.compute_stats()?)
    }

    /// Writes every grade to `path` as CSV and returns the number of data rows.
    ///
    /// The target is overwritten. Rows follow [`Self::all`] order.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> ServiceResult<usize> {
        let started_at = Instant::now();
        info!("event=csv_export module=service status=start");

        let result = self.write_csv(path.as_ref());
        match &result {
            Ok(count) => info!(
                "event=csv_export module=service status=ok rows={count} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=csv_export module=service status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    /// Imports grades from a CSV file and returns the number of rows created.
    ///
    /// Every data row goes through [`Self::create_grade`]. The first failing
    /// row aborts the import; rows before it remain persisted.
    ///
    /// # Errors
    /// - `FileNotFound` when `path` does not exist.
    /// - `Schema` when the header lacks `name`, `subject` or `score`.
    /// - `ImportRow` carrying the failing file row (header = row 1), the count
    ///   imported so far, and the underlying cause.
    pub fn import_csv(&self, path: impl AsRef<Path>) -> ServiceResult<usize> {
        let path = path.as_ref();
        let started_at = Instant::now();
        info!("event=csv_import module=service status=start");

        let result = self.read_csv(path);
        match &result {
            Ok(count) => info!(
                "event=csv_import module=service status=ok rows={count} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(ServiceError::ImportRow { row, imported, .. }) => error!(
                "event=csv_import module=service status=error error_code=row_invalid row={row} imported={imported} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=csv_import module=service status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn write_csv(&self, path: &Path) -> ServiceResult<usize> {
        let records = self.repo.all_grades()?;
        let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record(EXPORT_HEADER)?;
        for record in &records {
            writer.serialize(ExportRow::from(record))?;
        }
        writer.flush()?;
        Ok(records.len())
    }

    fn read_csv(&self, path: &Path) -> ServiceResult<usize> {
        if !path.exists() {
            return Err(ServiceError::FileNotFound(path.to_path_buf()));
        }

        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let columns = ImportColumns::resolve(reader.headers()?)
            .map_err(|missing| ServiceError::Schema { missing })?;

        let mut imported = 0;
        for (index, record) in reader.records().enumerate() {
            let outcome = record.map_err(ServiceError::from).and_then(|record| {
                let row = columns.read(&record);
                self.create_grade(row.student_no, row.name, row.subject, row.score)
            });
            if let Err(source) = outcome {
                return Err(ServiceError::ImportRow {
                    row: index + 2,
                    imported,
                    source: Box::new(source),
                });
            }
            imported += 1;
        }

        Ok(imported)
    }
}

fn validated_fields(
    student_no: &str,
    name: &str,
    subject: &str,
    raw_score: &str,
) -> Result<GradeFields, GradeValidationError> {
    let score = parse_score(raw_score)?;
    let fields = GradeFields::new(student_no, name, subject, score);
    fields.validate()?;
    Ok(fields.normalized())
}
