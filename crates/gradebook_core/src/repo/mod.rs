//! Record Store: persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Own every SQL statement that touches `grades`.
//! - Translate storage rejections into semantic errors.
//!
//! # Invariants
//! - Writes commit before returning; nothing is staged.
//! - Rows leave this layer only as typed `GradeRecord` values.

pub mod grade_repo;
