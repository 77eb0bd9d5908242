//! Repository layer for SQLite persistence.
//!
//! The store is insert-only: entities with a natural key are deduplicated on
//! it, comments are appended, and at most one media file is kept per owner.
//! Every operation opens its own connection.

mod store;
mod table;

pub use store::{Store, StoreStats};
pub use table::Table;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("column `{column}` is not part of table `{table}`")]
    InvalidColumn { table: &'static str, column: String },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Open a connection with the pragmas every store operation relies on.
pub(crate) fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Map `QueryReturnedNoRows` to `None`.
pub(crate) fn to_option<T>(result: rusqlite::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
