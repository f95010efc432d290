use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single row of the profile's browsing history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    /// `None` when the stored timestamp cannot be represented.
    pub last_visit: Option<DateTime<Utc>>,
    pub visit_count: i64,
}

impl HistoryEntry {
    /// Formats the visit time for display, or `Unknown`.
    pub fn visit_time_display(&self) -> String {
        match self.last_visit {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "Unknown".to_string(),
        }
    }
}
