//! Key-value repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide whole-value read and overwrite for named storage slots.
//!
//! # Invariants
//! - `set_value` replaces the slot content in a single statement.
//! - Values are opaque text; interpretation belongs to callers.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for key-value persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted slot data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
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
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistent key-value slots.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, or `None` when the slot is empty.
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites the value stored under `key`.
    fn set_value(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get_value(key)
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set_value(key, value)
    }
}

/// SQLite-backed key-value slots over the `kv_store` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, rusqlite::types::Value>(0),
            )
            .optional()?;

        match value {
            None => Ok(None),
            Some(rusqlite::types::Value::Text(text)) => Ok(Some(text)),
            Some(other) => Err(RepoError::InvalidData(format!(
                "expected text in kv_store.value for key `{key}`, got {:?}",
                other.data_type()
            ))),
        }
    }

    fn set_value(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, RepoError, SqliteKeyValueStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn missing_key_reads_as_none() {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueStore::new(&conn);
        assert_eq!(kv.get_value("invoices").unwrap(), None);
    }

    #[test]
    fn set_value_overwrites_whole_slot() {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueStore::new(&conn);

        kv.set_value("invoices", "[1]").unwrap();
        kv.set_value("invoices", "[]").unwrap();

        assert_eq!(kv.get_value("invoices").unwrap().as_deref(), Some("[]"));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn non_text_value_is_invalid_data() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES ('invoices', x'00ff');",
            [],
        )
        .unwrap();

        let kv = SqliteKeyValueStore::new(&conn);
        let err = kv.get_value("invoices").unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
