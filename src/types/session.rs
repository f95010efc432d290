use serde::{Deserialize, Serialize};

use crate::services::markup::is_internal_url;

/// Windows and tabs recovered from one snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecoveredSession {
    /// Label of the snapshot file the windows came from, if any.
    pub source: Option<String>,
    pub windows: Vec<Window>,
}

impl RecoveredSession {
    pub fn tab_count(&self) -> usize {
        self.windows.iter().map(|w| w.tabs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Tabs a report lists, see [`Tab::is_listed`].
    pub fn listed_tab_count(&self, include_internal_urls: bool) -> usize {
        self.windows
            .iter()
            .flat_map(|w| &w.tabs)
            .filter(|t| t.is_listed(include_internal_urls))
            .count()
    }
}

/// A browser window and its tabs in tab-strip order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Window {
    pub window_id: i32,
    pub tabs: Vec<Tab>,
    /// Index into `tabs`; `None` only when the window has no tabs.
    pub active_tab_index: Option<usize>,
}

impl Window {
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_index.and_then(|i| self.tabs.get(i))
    }
}

/// A tab with its back/forward navigation stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tab {
    pub tab_id: i32,
    pub window_id: i32,
    /// Declared position within the window.
    pub position: i32,
    pub pinned: bool,
    pub navigations: Vec<NavigationEntry>,
    /// Always a valid index into `navigations`, or 0 when the stack is empty.
    pub current_index: usize,
}

impl Tab {
    /// The entry the tab was showing.
    pub fn current_entry(&self) -> Option<&NavigationEntry> {
        self.navigations.get(self.current_index)
    }

    /// Whether the tab shows up in a report: it has a current entry, and
    /// that entry is not an internal page unless those are included.
    pub fn is_listed(&self, include_internal_urls: bool) -> bool {
        self.current_entry()
            .is_some_and(|e| include_internal_urls || !is_internal_url(&e.url))
    }
}

/// One visited page in a tab's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationEntry {
    pub url: String,
    pub title: String,
    pub ordinal: usize,
}
