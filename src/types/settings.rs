use serde::{Deserialize, Serialize};

/// User-tunable recovery settings.
///
/// Every field has a default, so a settings file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecoverySettings {
    /// Maximum number of history rows to read, most recent first.
    pub history_limit: usize,
    /// Show `chrome://` and similar internal pages in the dashboard.
    pub include_internal_urls: bool,
    /// List each tab's back/forward entries under it.
    pub show_navigation_history: bool,
    pub dashboard_file_name: String,
    pub bookmarks_file_name: String,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            history_limit: 5000,
            include_internal_urls: false,
            show_navigation_history: true,
            dashboard_file_name: "Chrome Recovery.html".to_string(),
            bookmarks_file_name: "Chrome Bookmarks.html".to_string(),
        }
    }
}
