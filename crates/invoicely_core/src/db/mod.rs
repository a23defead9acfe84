//! Local SQLite file that holds the saved invoice list.
//!
//! The database plays the role of a browser key-value store: one `kv_store`
//! row per slot, with the `invoices` slot carrying the whole JSON list.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A connection handed out by [`open_db`] or [`open_db_in_memory`] is fully
//!   migrated; a file written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Opening, configuring or querying the file failed.
    Sqlite(rusqlite::Error),
    /// One migration step could not be applied; the whole upgrade was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file carries a schema from a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "invoice database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "invoice database upgrade to v{version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "invoice database schema v{found} is newer than this build (up to v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
