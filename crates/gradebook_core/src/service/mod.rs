//! Validation & transformation services.
//!
//! # Responsibility
//! - Turn raw user/file input into validated grade fields.
//! - Transcode between CSV files and the record store.
//! - Keep presentation callers decoupled from storage details.

pub mod csv_codec;
pub mod grade_service;
