//! Process configuration resolved from the environment.
//!
//! # Responsibility
//! - Decide where the gradebook database and rolling logs live.
//!
//! # Invariants
//! - Blank environment values behave as unset.
//! - Resolution never fails; every setting has a default.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "GRADEBOOK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "GRADEBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "GRADEBOOK_LOG_DIR";

/// Database file created in the working directory when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "gradebook.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "gradebook-logs";

/// Resolved process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Must be absolute for [`crate::logging::init_logging`].
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)),
        }
    }
}
