//! Unit tests for folding events into windows, tabs and navigation stacks.

use profile_recovery::snapshot::reconstruct;
use profile_recovery::types::snapshot::{Anomaly, Event};

fn window(window_id: i32) -> Event {
    Event::WindowCreated { window_id }
}

fn tab(window_id: i32, tab_id: i32, index_in_window: i32) -> Event {
    Event::TabCreated {
        window_id,
        tab_id,
        index_in_window,
    }
}

fn nav(tab_id: i32, nav_index: i32, url: &str) -> Event {
    Event::NavigationEntryAdded {
        tab_id,
        nav_index,
        url: url.to_string(),
        title: String::new(),
    }
}

fn urls(events: Vec<Event>, tab_id: i32) -> Vec<String> {
    let result = reconstruct(events);
    result
        .session
        .windows
        .iter()
        .flat_map(|w| &w.tabs)
        .find(|t| t.tab_id == tab_id)
        .map(|t| t.navigations.iter().map(|n| n.url.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn end_to_end_single_tab() {
    let result = reconstruct(vec![
        window(1),
        tab(1, 1, 0),
        nav(1, 0, "https://a"),
        nav(1, 1, "https://b"),
        Event::ActiveNavigationIndexSet {
            tab_id: 1,
            nav_index: 1,
        },
    ]);

    assert!(result.anomalies.is_empty());
    let windows = &result.session.windows;
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].tabs.len(), 1);
    let t = &windows[0].tabs[0];
    assert_eq!(
        t.navigations.iter().map(|n| n.url.as_str()).collect::<Vec<_>>(),
        vec!["https://a", "https://b"]
    );
    assert_eq!(t.current_index, 1);
    assert_eq!(t.current_entry().unwrap().url, "https://b");
    assert_eq!(windows[0].active_tab_index, Some(0));
}

#[test]
fn empty_stream_yields_no_windows() {
    let result = reconstruct(Vec::new());
    assert!(result.session.is_empty());
    assert!(result.anomalies.is_empty());
}

#[test]
fn windows_keep_creation_order() {
    let result = reconstruct(vec![window(9), window(2), window(5)]);
    let ids: Vec<i32> = result.session.windows.iter().map(|w| w.window_id).collect();
    assert_eq!(ids, vec![9, 2, 5]);
}

#[test]
fn tabs_sort_by_position_then_creation() {
    let result = reconstruct(vec![
        window(1),
        tab(1, 10, 2),
        tab(1, 11, 0),
        tab(1, 12, 2),
        Event::TabMoved {
            tab_id: 11,
            index_in_window: 5,
        },
    ]);
    let ids: Vec<i32> = result.session.windows[0]
        .tabs
        .iter()
        .map(|t| t.tab_id)
        .collect();
    assert_eq!(ids, vec![10, 12, 11]);
}

#[test]
fn duplicate_creation_keeps_the_first() {
    let result = reconstruct(vec![
        window(1),
        window(1),
        tab(1, 3, 0),
        nav(3, 0, "https://kept"),
        tab(1, 3, 4),
    ]);
    assert_eq!(result.session.windows.len(), 1);
    let t = &result.session.windows[0].tabs[0];
    assert_eq!(t.position, 0);
    assert_eq!(t.navigations.len(), 1);
    assert_eq!(
        result.anomalies,
        vec![
            Anomaly::DuplicateWindow { window_id: 1 },
            Anomaly::DuplicateTab { tab_id: 3 },
        ]
    );
}

#[test]
fn orphan_references_are_dropped() {
    let result = reconstruct(vec![
        tab(4, 1, 0),
        nav(2, 0, "https://nowhere"),
        Event::TabPinned {
            tab_id: 2,
            pinned: true,
        },
    ]);
    assert!(result.session.is_empty());
    assert_eq!(
        result.anomalies,
        vec![
            Anomaly::UnknownWindow { window_id: 4 },
            Anomaly::UnknownTab { tab_id: 2 },
            Anomaly::UnknownTab { tab_id: 2 },
        ]
    );
}

#[test]
fn navigation_overwrite_truncates_forward_history() {
    let got = urls(
        vec![
            window(1),
            tab(1, 1, 0),
            nav(1, 0, "a"),
            nav(1, 1, "b"),
            nav(1, 2, "c"),
            nav(1, 1, "x"),
        ],
        1,
    );
    assert_eq!(got, vec!["a", "x"]);
}

#[test]
fn navigation_gap_appends_with_anomaly() {
    let result = reconstruct(vec![window(1), tab(1, 1, 0), nav(1, 0, "a"), nav(1, 5, "b")]);
    let t = &result.session.windows[0].tabs[0];
    assert_eq!(t.navigations.len(), 2);
    assert_eq!(t.navigations[1].url, "b");
    assert_eq!(t.navigations[1].ordinal, 1);
    assert_eq!(
        result.anomalies,
        vec![Anomaly::NavigationIndexOutOfRange {
            tab_id: 1,
            nav_index: 5,
            len: 1
        }]
    );
}

#[test]
fn negative_navigation_index_is_dropped() {
    let result = reconstruct(vec![window(1), tab(1, 1, 0), nav(1, -1, "a")]);
    assert!(result.session.windows[0].tabs[0].navigations.is_empty());
    assert_eq!(
        result.anomalies,
        vec![Anomaly::NavigationIndexOutOfRange {
            tab_id: 1,
            nav_index: -1,
            len: 0
        }]
    );
}

#[test]
fn prune_keeps_leading_entries() {
    let got = urls(
        vec![
            window(1),
            tab(1, 1, 0),
            nav(1, 0, "a"),
            nav(1, 1, "b"),
            nav(1, 2, "c"),
            Event::NavigationPruned { tab_id: 1, count: 1 },
        ],
        1,
    );
    assert_eq!(got, vec!["a"]);
}

#[test]
fn current_index_defaults_to_last_entry() {
    let result = reconstruct(vec![window(1), tab(1, 1, 0), nav(1, 0, "a"), nav(1, 1, "b")]);
    assert_eq!(result.session.windows[0].tabs[0].current_index, 1);
}

#[test]
fn current_index_is_clamped_at_freeze() {
    let result = reconstruct(vec![
        window(1),
        tab(1, 1, 0),
        Event::ActiveNavigationIndexSet {
            tab_id: 1,
            nav_index: 7,
        },
        nav(1, 0, "a"),
        nav(1, 1, "b"),
    ]);
    assert_eq!(result.session.windows[0].tabs[0].current_index, 1);
    assert_eq!(
        result.anomalies,
        vec![Anomaly::NavigationPointerClamped {
            tab_id: 1,
            requested: 7,
            clamped: 1
        }]
    );
}

#[test]
fn closed_tab_never_reappears() {
    let result = reconstruct(vec![
        window(1),
        tab(1, 1, 0),
        tab(1, 2, 1),
        Event::TabClosed { tab_id: 1 },
        nav(1, 0, "late"),
        tab(1, 1, 0),
    ]);
    let ids: Vec<i32> = result.session.windows[0]
        .tabs
        .iter()
        .map(|t| t.tab_id)
        .collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(
        result.anomalies,
        vec![
            Anomaly::ClosedTabReference { tab_id: 1 },
            Anomaly::ClosedTabReference { tab_id: 1 },
        ]
    );
}

#[test]
fn closing_a_window_drops_its_tabs() {
    let result = reconstruct(vec![
        window(1),
        window(2),
        tab(1, 1, 0),
        tab(2, 2, 0),
        Event::WindowClosed { window_id: 1 },
        nav(1, 0, "gone"),
        window(1),
    ]);
    let ids: Vec<i32> = result.session.windows.iter().map(|w| w.window_id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(
        result.anomalies,
        vec![
            Anomaly::ClosedTabReference { tab_id: 1 },
            Anomaly::ClosedWindowReference { window_id: 1 },
        ]
    );
}

#[test]
fn active_tab_by_id_resolves_to_position() {
    let result = reconstruct(vec![
        window(1),
        tab(1, 10, 0),
        tab(1, 11, 1),
        Event::ActiveTabSet {
            window_id: 1,
            tab_id: 11,
        },
    ]);
    let w = &result.session.windows[0];
    assert_eq!(w.active_tab_index, Some(1));
    assert_eq!(w.active_tab().unwrap().tab_id, 11);
}

#[test]
fn active_tab_pointing_at_closed_tab_falls_back_to_first() {
    let result = reconstruct(vec![
        window(1),
        tab(1, 10, 0),
        tab(1, 11, 1),
        Event::ActiveTabSet {
            window_id: 1,
            tab_id: 11,
        },
        Event::TabClosed { tab_id: 11 },
    ]);
    assert_eq!(result.session.windows[0].active_tab_index, Some(0));
    assert_eq!(
        result.anomalies,
        vec![Anomaly::ActiveTabMissing {
            window_id: 1,
            tab_id: 11
        }]
    );
}

#[test]
fn active_tab_index_is_clamped() {
    let result = reconstruct(vec![
        window(1),
        tab(1, 10, 0),
        Event::ActiveTabIndexSet {
            window_id: 1,
            tab_index: 4,
        },
    ]);
    assert_eq!(result.session.windows[0].active_tab_index, Some(0));
    assert_eq!(
        result.anomalies,
        vec![Anomaly::ActiveTabClamped {
            window_id: 1,
            requested: 4,
            clamped: 0
        }]
    );
}

#[test]
fn window_without_tabs_has_no_active_tab() {
    let result = reconstruct(vec![window(3)]);
    assert_eq!(result.session.windows[0].active_tab_index, None);
    assert!(result.session.windows[0].active_tab().is_none());
}

#[test]
fn pinned_state_is_applied() {
    let result = reconstruct(vec![
        window(1),
        tab(1, 1, 0),
        Event::TabPinned {
            tab_id: 1,
            pinned: true,
        },
    ]);
    assert!(result.session.windows[0].tabs[0].pinned);
}

#[test]
fn unknown_events_are_ignored() {
    let result = reconstruct(vec![
        window(1),
        Event::Unknown {
            tag: 99,
            payload_len: 4,
        },
    ]);
    assert_eq!(result.session.windows.len(), 1);
    assert!(result.anomalies.is_empty());
}
