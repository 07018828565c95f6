//! Gradebook store handle: opening the SQLite file and ensuring the schema.
//!
//! # Invariants
//! - A handle is usable only after `schema.sql` ran on it.
//! - Schema bootstrap is idempotent; reopening an existing file never
//!   alters stored rows.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Store-level failure.
#[derive(Debug)]
pub enum DbError {
    /// The database file (or in-memory store) could not be opened.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Pragmas or `CREATE ... IF NOT EXISTS` failed, e.g. the file is not a
    /// SQLite database.
    Bootstrap(rusqlite::Error),
    /// A statement against an open store failed.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open gradebook store `{target}`: {source}")
            }
            Self::Bootstrap(err) => write!(f, "cannot prepare gradebook schema: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Bootstrap(err) | Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
