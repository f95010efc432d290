//! End-to-end tests for recovering a whole profile folder.

use std::fs;
use std::path::Path;

use profile_recovery::app::App;
use profile_recovery::snapshot::SnapshotWriter;
use profile_recovery::types::errors::ProfileError;
use profile_recovery::types::settings::RecoverySettings;
use profile_recovery::types::snapshot::SnapshotVersion;
use rusqlite::{params, Connection};
use tempfile::TempDir;

const JAN_2021: i64 = 13_253_932_800_000_000;

fn write_session(profile: &Path) {
    let mut w = SnapshotWriter::new(SnapshotVersion::V3);
    w.window_created(1)
        .tab_created(1, 1, 0)
        .navigation(1, 0, "https://a.example", "A")
        .tab_created(1, 2, 1)
        .navigation(2, 0, "https://b.example", "B")
        .tab_created(1, 3, 2)
        .navigation(3, 0, "https://c.example", "C")
        .active_tab_index(1, 2);
    fs::write(profile.join("Current Session"), w.finish()).unwrap();
}

fn write_bookmarks(profile: &Path) {
    fs::write(
        profile.join("Bookmarks"),
        r#"{"roots": {"bookmark_bar": {"type": "folder", "name": "Bar", "children": [
            {"type": "url", "name": "Rust", "url": "https://www.rust-lang.org/"}
        ]}}}"#,
    )
    .unwrap();
}

fn write_history(profile: &Path, rows: usize) {
    let conn = Connection::open(profile.join("History")).unwrap();
    conn.execute_batch(
        "CREATE TABLE urls (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, \
         visit_count INTEGER DEFAULT 0 NOT NULL, last_visit_time INTEGER NOT NULL);",
    )
    .unwrap();
    for i in 0..rows {
        conn.execute(
            "INSERT INTO urls (url, title, visit_count, last_visit_time) VALUES (?1, ?2, 1, ?3)",
            params![
                format!("https://h{}.example", i),
                format!("H{}", i),
                JAN_2021 + i as i64
            ],
        )
        .unwrap();
    }
}

#[test]
fn recovers_everything_and_writes_outputs() {
    let profile = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_session(profile.path());
    write_bookmarks(profile.path());
    write_history(profile.path(), 120);

    let app = App::new(profile.path(), RecoverySettings::default()).unwrap();
    let report = app.run(out.path()).unwrap();

    assert_eq!(
        report.summary(),
        "Recovered: 3 open tabs, bookmarks, 120 history entries."
    );
    assert_eq!(report.dashboard_path, out.path().join("Chrome Recovery.html"));
    assert_eq!(
        report.bookmarks_path.as_deref(),
        Some(out.path().join("Chrome Bookmarks.html").as_path())
    );
    assert!(report.dashboard_path.is_file());

    let tabs = report.profile.tabs.unwrap();
    assert_eq!(tabs.windows[0].active_tab().unwrap().tab_id, 3);
}

#[test]
fn history_limit_is_honoured() {
    let profile = TempDir::new().unwrap();
    write_history(profile.path(), 30);

    let settings = RecoverySettings {
        history_limit: 10,
        ..RecoverySettings::default()
    };
    let app = App::new(profile.path(), settings).unwrap();
    assert_eq!(app.recover_history().unwrap().len(), 10);
}

#[test]
fn sections_are_recovered_independently() {
    let profile = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_session(profile.path());
    fs::write(profile.path().join("Bookmarks"), "{ broken").unwrap();

    let app = App::new(profile.path(), RecoverySettings::default()).unwrap();
    let report = app.run(out.path()).unwrap();

    assert!(report.profile.tabs.is_some());
    assert!(report.profile.bookmarks.is_none());
    assert!(report.profile.history.is_none());
    assert!(report.bookmarks_path.is_none());
    assert!(!out.path().join("Chrome Bookmarks.html").exists());
    assert_eq!(report.summary(), "Recovered: 3 open tabs.");
}

#[test]
fn unreadable_snapshots_mean_no_tab_section() {
    let profile = TempDir::new().unwrap();
    fs::write(profile.path().join("Current Session"), b"not a snapshot").unwrap();
    write_bookmarks(profile.path());

    let app = App::new(profile.path(), RecoverySettings::default()).unwrap();
    let (recovered, _) = app.recover();
    assert!(recovered.tabs.is_none());
    assert_eq!(recovered.summary(false), "Recovered: bookmarks.");
}

fn write_session_with_internal_tab(profile: &Path) {
    let mut w = SnapshotWriter::new(SnapshotVersion::V3);
    w.window_created(1)
        .tab_created(1, 1, 0)
        .navigation(1, 0, "chrome://newtab/", "New Tab")
        .tab_created(1, 2, 1)
        .navigation(2, 0, "https://a.example/", "A");
    fs::write(profile.join("Current Session"), w.finish()).unwrap();
}

#[test]
fn summary_counts_the_tabs_the_dashboard_lists() {
    let profile = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_session_with_internal_tab(profile.path());

    let app = App::new(profile.path(), RecoverySettings::default()).unwrap();
    let report = app.run(out.path()).unwrap();

    assert_eq!(report.profile.tabs.as_ref().unwrap().tab_count(), 2);
    assert_eq!(report.summary(), "Recovered: 1 open tab.");
    let html = fs::read_to_string(&report.dashboard_path).unwrap();
    assert!(html.contains(
        "<h2 id=\"tabs\">Open Tabs <span class=\"section-count\">(1)</span></h2>"
    ));
}

#[test]
fn internal_tabs_are_counted_when_included() {
    let profile = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_session_with_internal_tab(profile.path());

    let settings = RecoverySettings {
        include_internal_urls: true,
        ..RecoverySettings::default()
    };
    let app = App::new(profile.path(), settings).unwrap();
    let report = app.run(out.path()).unwrap();

    assert_eq!(report.summary(), "Recovered: 2 open tabs.");
    let html = fs::read_to_string(&report.dashboard_path).unwrap();
    assert!(html.contains("Open Tabs <span class=\"section-count\">(2)</span>"));
}

#[test]
fn profile_must_be_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file");
    fs::write(&file, "x").unwrap();

    assert!(matches!(
        App::new(&file, RecoverySettings::default()),
        Err(ProfileError::NotADirectory(_))
    ));
}

#[test]
fn directory_without_profile_files_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Preferences"), "{}").unwrap();
    assert!(matches!(
        App::validate_profile(dir.path()),
        Err(ProfileError::NotAProfile(_))
    ));
}

#[test]
fn any_one_profile_file_is_enough() {
    let dir = TempDir::new().unwrap();
    write_bookmarks(dir.path());
    assert!(App::validate_profile(dir.path()).is_ok());
}

#[test]
fn output_directory_is_created() {
    let profile = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_bookmarks(profile.path());
    let target = out.path().join("nested").join("recovery");

    let app = App::new(profile.path(), RecoverySettings::default()).unwrap();
    let report = app.run(&target).unwrap();
    assert!(report.dashboard_path.starts_with(&target));
    assert!(report.dashboard_path.is_file());
}
