//! Grade record, business fields, and search criteria.
//!
//! # Invariants
//! - `score` lies in the closed interval [`SCORE_MIN`, `SCORE_MAX`].
//! - `name` and `subject` are non-empty after trimming.
//! - `id` and `created_at` are assigned by the store exactly once.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type GradeId = i64;

/// Lowest accepted score (inclusive).
pub const SCORE_MIN: f64 = 0.0;
/// Highest accepted score (inclusive).
pub const SCORE_MAX: f64 = 100.0;

/// Field-level validation failure.
///
/// `Display` output is short and meant to be shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeValidationError {
    ScoreNotNumeric,
    ScoreOutOfRange,
    NameRequired,
    SubjectRequired,
}

impl Display for GradeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::ScoreNotNumeric => "score must be numeric",
            Self::ScoreOutOfRange => "score out of range",
            Self::NameRequired => "name required",
            Self::SubjectRequired => "subject required",
        };
        f.write_str(message)
    }
}

impl Error for GradeValidationError {}

/// One persisted grade row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: GradeId,
    /// Empty when the student number was not provided.
    pub student_no: String,
    pub name: String,
    pub subject: String,
    pub score: f64,
    /// SQLite `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created_at: String,
}

impl GradeRecord {
    /// Returns the replaceable business fields of this record.
    pub fn fields(&self) -> GradeFields {
        GradeFields {
            student_no: self.student_no.clone(),
            name: self.name.clone(),
            subject: self.subject.clone(),
            score: self.score,
        }
    }
}

/// The four business fields written by insert and full-replace update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeFields {
    pub student_no: String,
    pub name: String,
    pub subject: String,
    pub score: f64,
}

impl GradeFields {
    pub fn new(
        student_no: impl Into<String>,
        name: impl Into<String>,
        subject: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            student_no: student_no.into(),
            name: name.into(),
            subject: subject.into(),
            score,
        }
    }

    /// Returns a copy with surrounding whitespace removed from text fields.
    pub fn normalized(&self) -> Self {
        Self {
            student_no: self.student_no.trim().to_string(),
            name: self.name.trim().to_string(),
            subject: self.subject.trim().to_string(),
            score: self.score,
        }
    }

    /// Checks score range, then `name`, then `subject`.
    ///
    /// # Errors
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), GradeValidationError> {
        check_score_range(self.score)?;
        if self.name.trim().is_empty() {
            return Err(GradeValidationError::NameRequired);
        }
        if self.subject.trim().is_empty() {
            return Err(GradeValidationError::SubjectRequired);
        }
        Ok(())
    }
}

/// Parses raw user/file input into a score.
///
/// Surrounding whitespace is ignored. `NaN` and infinities parse but are
/// rejected as out of range.
///
/// # Errors
/// - [`GradeValidationError::ScoreNotNumeric`] when `raw` is not a decimal number.
/// - [`GradeValidationError::ScoreOutOfRange`] when the value is outside [0, 100].
pub fn parse_score(raw: &str) -> Result<f64, GradeValidationError> {
    let score = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| GradeValidationError::ScoreNotNumeric)?;
    check_score_range(score)?;
    Ok(score)
}

fn check_score_range(score: f64) -> Result<(), GradeValidationError> {
    if (SCORE_MIN..=SCORE_MAX).contains(&score) {
        Ok(())
    } else {
        Err(GradeValidationError::ScoreOutOfRange)
    }
}

/// Optional substring criteria for a grade search.
///
/// `None` or blank means "no constraint on this column".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeFilter {
    pub student_no: Option<String>,
    pub name: Option<String>,
    pub subject: Option<String>,
}

impl GradeFilter {
    pub fn new(student_no: Option<&str>, name: Option<&str>, subject: Option<&str>) -> Self {
        Self {
            student_no: normalize_pattern(student_no),
            name: normalize_pattern(name),
            subject: normalize_pattern(subject),
        }
    }

    /// Returns whether the filter constrains nothing.
    pub fn is_unconstrained(&self) -> bool {
        [&self.student_no, &self.name, &self.subject]
            .iter()
            .all(|pattern| normalize_pattern(pattern.as_deref()).is_none())
    }
}

/// Trims a search pattern and collapses blank input to `None`.
pub fn normalize_pattern(pattern: Option<&str>) -> Option<String> {
    pattern
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{parse_score, GradeFields, GradeFilter, GradeValidationError};

    #[test]
    fn parse_score_accepts_bounds_and_padding() {
        assert_eq!(parse_score("0"), Ok(0.0));
        assert_eq!(parse_score(" 100 "), Ok(100.0));
        assert_eq!(parse_score("88.5"), Ok(88.5));
    }

    #[test]
    fn parse_score_rejects_non_numeric_and_out_of_range() {
        assert_eq!(parse_score("abc"), Err(GradeValidationError::ScoreNotNumeric));
        assert_eq!(parse_score(""), Err(GradeValidationError::ScoreNotNumeric));
        assert_eq!(parse_score("-0.5"), Err(GradeValidationError::ScoreOutOfRange));
        assert_eq!(parse_score("100.01"), Err(GradeValidationError::ScoreOutOfRange));
        assert_eq!(parse_score("NaN"), Err(GradeValidationError::ScoreOutOfRange));
        assert_eq!(parse_score("inf"), Err(GradeValidationError::ScoreOutOfRange));
    }

    #[test]
    fn validate_reports_score_before_text_fields() {
        let fields = GradeFields::new("", " ", "", 150.0);
        assert_eq!(fields.validate(), Err(GradeValidationError::ScoreOutOfRange));

        let fields = GradeFields::new("", " ", "", 50.0);
        assert_eq!(fields.validate(), Err(GradeValidationError::NameRequired));

        let fields = GradeFields::new("", "Alice", "\t", 50.0);
        assert_eq!(fields.validate(), Err(GradeValidationError::SubjectRequired));
    }

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(
            GradeValidationError::ScoreNotNumeric.to_string(),
            "score must be numeric"
        );
        assert_eq!(
            GradeValidationError::ScoreOutOfRange.to_string(),
            "score out of range"
        );
        assert_eq!(GradeValidationError::NameRequired.to_string(), "name required");
        assert_eq!(
            GradeValidationError::SubjectRequired.to_string(),
            "subject required"
        );
    }

    #[test]
    fn normalized_trims_text_fields_only() {
        let fields = GradeFields::new(" S1 ", " Alice ", " Math ", 90.0).normalized();
        assert_eq!(fields, GradeFields::new("S1", "Alice", "Math", 90.0));
    }

    #[test]
    fn blank_filter_fields_are_unconstrained() {
        assert!(GradeFilter::new(Some("  "), None, Some("")).is_unconstrained());
        let filter = GradeFilter::new(None, Some(" Ali "), None);
        assert_eq!(filter.name.as_deref(), Some("Ali"));
        assert!(!filter.is_unconstrained());
    }
}
