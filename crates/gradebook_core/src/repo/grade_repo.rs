//! Grade repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/update/delete/search/stats over the `grades` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The table `CHECK` constraints are the last gate for score range and
//!   required text; violations surface as `RepoError::ConstraintViolation`.
//! - Text fields are trimmed before every write.
//! - Search order is `created_at DESC, id DESC`.
//!
//! # Known permissive behavior
//! - `update_grade` on an id with no row changes nothing and succeeds.
//! - `delete_grade` on an id with no row changes nothing and succeeds.

use crate::db::DbError;
use crate::model::grade::{normalize_pattern, GradeFields, GradeFilter, GradeId, GradeRecord};
use crate::model::stats::{StatsSummary, SubjectStats};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const GRADE_SELECT_SQL: &str = "SELECT
    id,
    student_no,
    name,
    subject,
    score,
    created_at
FROM grades";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for grade persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage rejected a write that violates a table constraint.
    ConstraintViolation(String),
    /// Caller omitted a required argument.
    InvalidArgument(&'static str),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstraintViolation(message) => {
                write!(f, "grade rejected by storage constraint: {message}")
            }
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted grade data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ConstraintViolation(_) | Self::InvalidArgument(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(value.to_string()),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Repository interface for the grade table.
pub trait GradeRepository {
    /// Inserts a new row and returns its store-assigned id.
    fn insert_grade(&self, fields: &GradeFields) -> RepoResult<GradeId>;
    /// Replaces all four business fields of the row with `id`.
    fn update_grade(&self, id: Option<GradeId>, fields: &GradeFields) -> RepoResult<()>;
    /// Removes the row with `id` when present.
    fn delete_grade(&self, id: GradeId) -> RepoResult<()>;
    fn get_grade(&self, id: GradeId) -> RepoResult<Option<GradeRecord>>;
    /// Returns rows matching every non-blank criterion, newest first.
    fn search_grades(&self, filter: &GradeFilter) -> RepoResult<Vec<GradeRecord>>;
    fn compute_stats(&self) -> RepoResult<StatsSummary>;

    /// Returns every row, newest first.
    fn all_grades(&self) -> RepoResult<Vec<GradeRecord>> {
        self.search_grades(&GradeFilter::default())
    }
}

/// SQLite-backed grade repository.
pub struct SqliteGradeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGradeRepository<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GradeRepository for SqliteGradeRepository<'_> {
    fn insert_grade(&self, fields: &GradeFields) -> RepoResult<GradeId> {
        let fields = fields.normalized();
        self.conn.execute(
            "INSERT INTO grades (student_no, name, subject, score)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                fields.student_no.as_str(),
                fields.name.as_str(),
                fields.subject.as_str(),
                fields.score,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_grade(&self, id: Option<GradeId>, fields: &GradeFields) -> RepoResult<()> {
        let id = id.ok_or(RepoError::InvalidArgument("update requires a grade id"))?;
        let fields = fields.normalized();
        self.conn.execute(
            "UPDATE grades
             SET
                student_no = ?1,
                name = ?2,
                subject = ?3,
                score = ?4
             WHERE id = ?5;",
            params![
                fields.student_no.as_str(),
                fields.name.as_str(),
                fields.subject.as_str(),
                fields.score,
                id,
            ],
        )?;

        Ok(())
    }

    fn delete_grade(&self, id: GradeId) -> RepoResult<()> {
        self.conn.execute("DELETE FROM grades WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn get_grade(&self, id: GradeId) -> RepoResult<Option<GradeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GRADE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_grade_row(row)?));
        }

        Ok(None)
    }

    fn search_grades(&self, filter: &GradeFilter) -> RepoResult<Vec<GradeRecord>> {
        let mut sql = format!("{GRADE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        // instr() keeps the match case-sensitive and treats `%`/`_` literally.
        for (column, pattern) in [
            ("student_no", &filter.student_no),
            ("name", &filter.name),
            ("subject", &filter.subject),
        ] {
            if let Some(pattern) = normalize_pattern(pattern.as_deref()) {
                sql.push_str(&format!(" AND instr(COALESCE({column}, ''), ?) > 0"));
                bind_values.push(Value::Text(pattern));
            }
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut grades = Vec::new();
        while let Some(row) = rows.next()? {
            grades.push(parse_grade_row(row)?);
        }

        Ok(grades)
    }

    fn compute_stats(&self) -> RepoResult<StatsSummary> {
        let (total, avg_score, max_score, min_score) = self.conn.query_row(
            "SELECT COUNT(*), AVG(score), MAX(score), MIN(score) FROM grades;",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                ))
            },
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT
                subject,
                COUNT(*) AS count,
                AVG(score) AS avg_score,
                MAX(score) AS max_score,
                MIN(score) AS min_score
             FROM grades
             GROUP BY subject
             ORDER BY subject ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(SubjectStats {
                subject: row.get("subject")?,
                count: count_from_db(row.get("count")?)?,
                avg_score: row.get("avg_score")?,
                max_score: row.get("max_score")?,
                min_score: row.get("min_score")?,
            });
        }

        Ok(StatsSummary {
            total: count_from_db(total)?,
            avg_score,
            max_score,
            min_score,
            subjects,
        })
    }
}

fn parse_grade_row(row: &Row<'_>) -> RepoResult<GradeRecord> {
    Ok(GradeRecord {
        id: row.get("id")?,
        student_no: row
            .get::<_, Option<String>>("student_no")?
            .unwrap_or_default(),
        name: row.get("name")?,
        subject: row.get("subject")?,
        score: row.get("score")?,
        created_at: row.get("created_at")?,
    })
}

fn count_from_db(value: i64) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{value}`")))
}
