//! Session reconstructor.
//!
//! Folds the decoded event stream of one snapshot file into windows, tabs
//! and navigation stacks. The fold is total: every event is either applied
//! or dropped with an [`Anomaly`]. Identifiers are only meaningful inside
//! one file, so a reconstructor must never be fed events from two files.

use std::collections::{HashMap, HashSet};

use crate::types::session::{NavigationEntry, RecoveredSession, Tab, Window};
use crate::types::snapshot::{Anomaly, Event};

/// Frozen output of one reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub session: RecoveredSession,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, Copy)]
enum ActivePointer {
    TabId(i32),
    Index(i32),
}

#[derive(Debug)]
struct WindowState {
    window_id: i32,
    open: bool,
    active: Option<ActivePointer>,
}

#[derive(Debug)]
struct TabState {
    tab_id: i32,
    window_id: i32,
    position: i32,
    ordinal: usize,
    pinned: bool,
    navigations: Vec<(String, String)>,
    current: Option<i32>,
}

impl TabState {
    /// Writes an entry at `nav_index`, dropping any forward history.
    fn add_navigation(&mut self, nav_index: i32, url: String, title: String) -> Option<Anomaly> {
        let len = self.navigations.len();
        let Ok(index) = usize::try_from(nav_index) else {
            return Some(Anomaly::NavigationIndexOutOfRange {
                tab_id: self.tab_id,
                nav_index,
                len,
            });
        };

        let anomaly = if index > len {
            Some(Anomaly::NavigationIndexOutOfRange {
                tab_id: self.tab_id,
                nav_index,
                len,
            })
        } else {
            self.navigations.truncate(index);
            None
        };
        self.navigations.push((url, title));
        anomaly
    }

    fn freeze(self, anomalies: &mut Vec<Anomaly>) -> Tab {
        let len = self.navigations.len();
        let current_index = match self.current {
            None => len.saturating_sub(1),
            Some(requested) => {
                let clamped = clamp_index(requested, len);
                if i64::from(requested) != clamped as i64 {
                    anomalies.push(Anomaly::NavigationPointerClamped {
                        tab_id: self.tab_id,
                        requested,
                        clamped,
                    });
                }
                clamped
            }
        };

        Tab {
            tab_id: self.tab_id,
            window_id: self.window_id,
            position: self.position,
            pinned: self.pinned,
            navigations: self
                .navigations
                .into_iter()
                .enumerate()
                .map(|(ordinal, (url, title))| NavigationEntry {
                    url,
                    title,
                    ordinal,
                })
                .collect(),
            current_index,
        }
    }
}

/// Clamps a stored pointer into `0..len`, or 0 for an empty sequence.
fn clamp_index(requested: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    usize::try_from(requested).map_or(0, |i| i.min(len - 1))
}

/// Mutable fold state for one snapshot file.
#[derive(Debug, Default)]
pub struct SessionReconstructor {
    windows: Vec<WindowState>,
    window_slots: HashMap<i32, usize>,
    tabs: HashMap<i32, TabState>,
    closed_windows: HashSet<i32>,
    closed_tabs: HashSet<i32>,
    next_ordinal: usize,
    anomalies: Vec<Anomaly>,
}

impl SessionReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anomalies recorded so far.
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// Adds an anomaly found outside the fold, such as by the decoder.
    pub fn note(&mut self, anomaly: Anomaly) {
        self.anomalies.push(anomaly);
    }

    /// Applies one event in encoding order.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::WindowCreated { window_id } => self.create_window(window_id),
            Event::WindowClosed { window_id } => self.close_window(window_id),
            Event::TabCreated {
                window_id,
                tab_id,
                index_in_window,
            } => self.create_tab(window_id, tab_id, index_in_window),
            Event::TabMoved {
                tab_id,
                index_in_window,
            } => {
                if let Some(tab) = self.live_tab(tab_id) {
                    tab.position = index_in_window;
                }
            }
            Event::TabClosed { tab_id } => self.close_tab(tab_id),
            Event::TabPinned { tab_id, pinned } => {
                if let Some(tab) = self.live_tab(tab_id) {
                    tab.pinned = pinned;
                }
            }
            Event::NavigationEntryAdded {
                tab_id,
                nav_index,
                url,
                title,
            } => {
                let Some(tab) = self.live_tab(tab_id) else {
                    return;
                };
                if let Some(anomaly) = tab.add_navigation(nav_index, url, title) {
                    self.note(anomaly);
                }
            }
            Event::NavigationPruned { tab_id, count } => {
                if let Some(tab) = self.live_tab(tab_id) {
                    tab.navigations.truncate(usize::try_from(count).unwrap_or(0));
                }
            }
            Event::ActiveTabSet { window_id, tab_id } => self.set_active_tab(window_id, tab_id),
            Event::ActiveTabIndexSet {
                window_id,
                tab_index,
            } => {
                if let Some(window) = self.live_window(window_id) {
                    window.active = Some(ActivePointer::Index(tab_index));
                }
            }
            Event::ActiveNavigationIndexSet { tab_id, nav_index } => {
                if let Some(tab) = self.live_tab(tab_id) {
                    tab.current = Some(nav_index);
                }
            }
            Event::Unknown { .. } => {}
        }
    }

    /// Returns the open window, recording why when there is none.
    fn live_window(&mut self, window_id: i32) -> Option<&mut WindowState> {
        if let Some(&slot) = self.window_slots.get(&window_id) {
            if self.windows[slot].open {
                return Some(&mut self.windows[slot]);
            }
        }
        let anomaly = if self.closed_windows.contains(&window_id) {
            Anomaly::ClosedWindowReference { window_id }
        } else {
            Anomaly::UnknownWindow { window_id }
        };
        self.note(anomaly);
        None
    }

    /// Returns the open tab, recording why when there is none.
    fn live_tab(&mut self, tab_id: i32) -> Option<&mut TabState> {
        if self.tabs.contains_key(&tab_id) {
            return self.tabs.get_mut(&tab_id);
        }
        let anomaly = if self.closed_tabs.contains(&tab_id) {
            Anomaly::ClosedTabReference { tab_id }
        } else {
            Anomaly::UnknownTab { tab_id }
        };
        self.note(anomaly);
        None
    }

    fn create_window(&mut self, window_id: i32) {
        if self.closed_windows.contains(&window_id) {
            self.note(Anomaly::ClosedWindowReference { window_id });
            return;
        }
        if self.window_slots.contains_key(&window_id) {
            self.note(Anomaly::DuplicateWindow { window_id });
            return;
        }
        self.window_slots.insert(window_id, self.windows.len());
        self.windows.push(WindowState {
            window_id,
            open: true,
            active: None,
        });
    }

    fn close_window(&mut self, window_id: i32) {
        let Some(window) = self.live_window(window_id) else {
            return;
        };
        window.open = false;
        self.closed_windows.insert(window_id);

        let orphaned: Vec<i32> = self
            .tabs
            .values()
            .filter(|t| t.window_id == window_id)
            .map(|t| t.tab_id)
            .collect();
        for tab_id in orphaned {
            self.tabs.remove(&tab_id);
            self.closed_tabs.insert(tab_id);
        }
    }

    fn create_tab(&mut self, window_id: i32, tab_id: i32, index_in_window: i32) {
        if self.closed_tabs.contains(&tab_id) {
            self.note(Anomaly::ClosedTabReference { tab_id });
            return;
        }
        if self.live_window(window_id).is_none() {
            return;
        }
        if self.tabs.contains_key(&tab_id) {
            self.note(Anomaly::DuplicateTab { tab_id });
            return;
        }

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        self.tabs.insert(
            tab_id,
            TabState {
                tab_id,
                window_id,
                position: index_in_window,
                ordinal,
                pinned: false,
                navigations: Vec::new(),
                current: None,
            },
        );
    }

    fn close_tab(&mut self, tab_id: i32) {
        if self.tabs.remove(&tab_id).is_some() {
            self.closed_tabs.insert(tab_id);
            return;
        }
        let anomaly = if self.closed_tabs.contains(&tab_id) {
            Anomaly::ClosedTabReference { tab_id }
        } else {
            Anomaly::UnknownTab { tab_id }
        };
        self.note(anomaly);
    }

    fn set_active_tab(&mut self, window_id: i32, tab_id: i32) {
        let in_window = match self.tabs.get(&tab_id) {
            Some(tab) => tab.window_id == window_id,
            None => false,
        };
        if !in_window {
            let anomaly = if self.closed_tabs.contains(&tab_id) {
                Anomaly::ClosedTabReference { tab_id }
            } else {
                Anomaly::UnknownTab { tab_id }
            };
            self.note(anomaly);
            return;
        }
        if let Some(window) = self.live_window(window_id) {
            window.active = Some(ActivePointer::TabId(tab_id));
        }
    }

    /// Freezes the fold into an immutable session.
    ///
    /// Windows keep creation order; tabs are ordered by declared position,
    /// ties broken by creation order.
    pub fn finish(self) -> Reconstruction {
        let mut anomalies = self.anomalies;

        let mut by_window: HashMap<i32, Vec<TabState>> = HashMap::new();
        for tab in self.tabs.into_values() {
            by_window.entry(tab.window_id).or_default().push(tab);
        }

        let mut windows = Vec::new();
        for state in self.windows.into_iter().filter(|w| w.open) {
            let mut tab_states = by_window.remove(&state.window_id).unwrap_or_default();
            tab_states.sort_by_key(|t| (t.position, t.ordinal));

            let tabs: Vec<Tab> = tab_states
                .into_iter()
                .map(|t| t.freeze(&mut anomalies))
                .collect();

            let active_tab_index = if tabs.is_empty() {
                None
            } else {
                Some(match state.active {
                    None => 0,
                    Some(ActivePointer::TabId(id)) => {
                        match tabs.iter().position(|t| t.tab_id == id) {
                            Some(i) => i,
                            None => {
                                anomalies.push(Anomaly::ActiveTabMissing {
                                    window_id: state.window_id,
                                    tab_id: id,
                                });
                                0
                            }
                        }
                    }
                    Some(ActivePointer::Index(requested)) => {
                        let clamped = clamp_index(requested, tabs.len());
                        if i64::from(requested) != clamped as i64 {
                            anomalies.push(Anomaly::ActiveTabClamped {
                                window_id: state.window_id,
                                requested,
                                clamped,
                            });
                        }
                        clamped
                    }
                })
            };

            windows.push(Window {
                window_id: state.window_id,
                tabs,
                active_tab_index,
            });
        }

        Reconstruction {
            session: RecoveredSession {
                source: None,
                windows,
            },
            anomalies,
        }
    }
}

/// Folds a whole event sequence.
pub fn reconstruct<I>(events: I) -> Reconstruction
where
    I: IntoIterator<Item = Event>,
{
    let mut reconstructor = SessionReconstructor::new();
    for event in events {
        reconstructor.apply(event);
    }
    reconstructor.finish()
}
