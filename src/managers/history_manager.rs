//! History Manager for profile recovery.
//!
//! Implements `HistoryManagerTrait`: listing and searching the `urls`
//! table of a profile's `History` database via `rusqlite`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::{params, Connection};

use crate::types::errors::HistoryError;
use crate::types::history::HistoryEntry;

/// File name of the history database inside a profile.
pub const HISTORY_FILE: &str = "History";

/// Trait defining history read operations.
pub trait HistoryManagerTrait {
    fn list_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError>;
    fn search_history(&self, query: &str, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError>;
}

/// History manager backed by a SQLite connection.
pub struct HistoryManager<'a> {
    conn: &'a Connection,
}

impl<'a> HistoryManager<'a> {
    /// Creates a new `HistoryManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Reads a single `urls` row into a `HistoryEntry`.
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<HistoryEntry> {
        let title: Option<String> = row.get(1)?;
        let visit_time: Option<i64> = row.get(2)?;
        let visit_count: Option<i64> = row.get(3)?;
        Ok(HistoryEntry {
            url: row.get(0)?,
            title: title.unwrap_or_default(),
            last_visit: visit_time.and_then(chrome_time_to_utc),
            visit_count: visit_count.unwrap_or(0),
        })
    }

    fn collect(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map(params, Self::row_to_entry)
            .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| HistoryError::DatabaseError(e.to_string()))?);
        }
        Ok(results)
    }
}

impl<'a> HistoryManagerTrait for HistoryManager<'a> {
    /// Lists up to `limit` entries, most recently visited first.
    fn list_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.collect(
            "SELECT url, title, last_visit_time, visit_count \
             FROM urls ORDER BY last_visit_time DESC LIMIT ?1",
            params![limit],
        )
    }

    /// Searches entries by title or URL using SQL LIKE.
    fn search_history(&self, query: &str, limit: usize) -> Result<Vec<HistoryEntry>, HistoryError> {
        let pattern = format!("%{}%", query);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.collect(
            "SELECT url, title, last_visit_time, visit_count \
             FROM urls WHERE title LIKE ?1 OR url LIKE ?2 \
             ORDER BY last_visit_time DESC LIMIT ?3",
            params![pattern, pattern, limit],
        )
    }
}

/// Converts a timestamp in microseconds since 1601-01-01 UTC.
///
/// Returns `None` for zero, negative, or out-of-range values.
pub fn chrome_time_to_utc(micros: i64) -> Option<DateTime<Utc>> {
    if micros <= 0 {
        return None;
    }
    let epoch = Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0).single()?;
    epoch.checked_add_signed(Duration::microseconds(micros))
}
