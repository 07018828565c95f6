//! Core domain logic for the gradebook.
//! This crate is the single source of truth for grade record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::grade::{
    parse_score, GradeFields, GradeFilter, GradeId, GradeRecord, GradeValidationError, SCORE_MAX,
    SCORE_MIN,
};
pub use model::stats::{StatsSummary, SubjectStats};
pub use repo::grade_repo::{GradeRepository, RepoError, RepoResult, SqliteGradeRepository};
pub use service::csv_codec::{EXPORT_HEADER, REQUIRED_IMPORT_COLUMNS};
pub use service::grade_service::{GradeService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
