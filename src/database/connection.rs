//! SQLite connection management for profile recovery.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! opened on a private copy of a profile database, so the browser's own
//! file is never locked or modified.

use std::fs;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tempfile::NamedTempFile;

/// Read-only database wrapper.
///
/// The `Database` owns the temporary copy and deletes it on drop.
pub struct Database {
    conn: Connection,
    _copy: NamedTempFile,
}

impl Database {
    /// Copies the database at `path` to a temporary file and opens the copy read-only.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the copy or the connection fails.
    pub fn open_copy<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let copy = NamedTempFile::new().map_err(io_to_sqlite)?;
        fs::copy(path.as_ref(), copy.path()).map_err(io_to_sqlite)?;

        let conn = Connection::open_with_flags(
            copy.path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn,
            _copy: copy,
        })
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn io_to_sqlite(e: std::io::Error) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}
