use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkTree;
use super::history::HistoryEntry;
use super::session::RecoveredSession;

/// Everything recovered from one profile.
///
/// Each part is `None` when its source could not be read. The parts are
/// recovered independently, so any combination may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecoveredProfile {
    pub tabs: Option<RecoveredSession>,
    pub bookmarks: Option<BookmarkTree>,
    pub history: Option<Vec<HistoryEntry>>,
}

impl RecoveredProfile {
    /// One-line description, e.g. `Recovered: 3 open tabs, bookmarks, 120 history entries.`
    ///
    /// Tabs are counted the way the dashboard lists them.
    pub fn summary(&self, include_internal_urls: bool) -> String {
        let mut parts = Vec::new();
        if let Some(session) = &self.tabs {
            let count = session.listed_tab_count(include_internal_urls);
            if count > 0 {
                parts.push(format!("{} open tab{}", count, plural(count)));
            }
        }
        if self.bookmarks.as_ref().is_some_and(|b| b.bookmark_count() > 0) {
            parts.push("bookmarks".to_string());
        }
        if let Some(history) = &self.history {
            if !history.is_empty() {
                parts.push(format!(
                    "{} history entr{}",
                    history.len(),
                    if history.len() == 1 { "y" } else { "ies" }
                ));
            }
        }

        if parts.is_empty() {
            "Nothing could be recovered.".to_string()
        } else {
            format!("Recovered: {}.", parts.join(", "))
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
