//! Grade domain model.
//!
//! # Responsibility
//! - Define the fixed-shape record read back from storage.
//! - Own field-level validation shared by the service and the store.
//!
//! # Invariants
//! - Every persisted grade is identified by a store-assigned `GradeId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod grade;
pub mod stats;
