//! Aggregate score statistics.

use serde::{Deserialize, Serialize};

/// Overall and per-subject score aggregates.
///
/// Overall `avg_score`/`max_score`/`min_score` are `None` when `total == 0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: u64,
    pub avg_score: Option<f64>,
    pub max_score: Option<f64>,
    pub min_score: Option<f64>,
    /// Sorted by `subject` ascending (byte order).
    pub subjects: Vec<SubjectStats>,
}

/// Aggregates for one subject. Only subjects with at least one row appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub subject: String,
    pub count: u64,
    pub avg_score: f64,
    pub max_score: f64,
    pub min_score: f64,
}
