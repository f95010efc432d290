//! Session Manager for profile recovery.
//!
//! Finds the session snapshot files of a profile, decodes each one
//! independently, and hands the results to the aggregator.

use std::fs;
use std::path::{Path, PathBuf};

use crate::snapshot::{self, aggregate, AggregatedRecovery, SnapshotCandidate};

/// Snapshot files written directly in the profile folder by older builds.
pub const LEGACY_SNAPSHOT_FILES: [(&str, SnapshotKind); 4] = [
    ("Current Session", SnapshotKind::Session),
    ("Last Session", SnapshotKind::Session),
    ("Current Tabs", SnapshotKind::Tabs),
    ("Last Tabs", SnapshotKind::Tabs),
];

/// Folder newer builds keep `Session_<n>` and `Tabs_<n>` files in.
pub const SESSIONS_DIR: &str = "Sessions";

/// What a snapshot file records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// Open windows and tabs.
    Session,
    /// Recently closed tabs.
    Tabs,
}

/// A snapshot file found in a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLocation {
    pub label: String,
    pub path: PathBuf,
    pub kind: SnapshotKind,
}

/// Trait defining session snapshot operations over a profile.
pub trait SessionManagerTrait {
    fn discover(&self) -> Vec<SnapshotLocation>;
    fn decode(&self, locations: &[SnapshotLocation], kind: SnapshotKind) -> Vec<SnapshotCandidate>;
    fn recover_tabs(&self) -> AggregatedRecovery;
    fn has_snapshots(&self) -> bool;
}

/// Session manager rooted at one profile folder.
pub struct SessionManager {
    profile_dir: PathBuf,
}

impl SessionManager {
    pub fn new<P: AsRef<Path>>(profile_dir: P) -> Self {
        Self {
            profile_dir: profile_dir.as_ref().to_path_buf(),
        }
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }

    /// Lists `Sessions/Session_*` and `Sessions/Tabs_*`, newest name first.
    fn discover_sessions_dir(&self) -> Vec<SnapshotLocation> {
        let dir = self.profile_dir.join(SESSIONS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut found: Vec<SnapshotLocation> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let kind = if name.starts_with("Session_") {
                    SnapshotKind::Session
                } else if name.starts_with("Tabs_") {
                    SnapshotKind::Tabs
                } else {
                    return None;
                };
                Some(SnapshotLocation {
                    label: format!("{}/{}", SESSIONS_DIR, name),
                    path: entry.path(),
                    kind,
                })
            })
            .collect();

        found.sort_by(|a, b| b.label.cmp(&a.label));
        found
    }
}

impl SessionManagerTrait for SessionManager {
    /// Returns every snapshot file present in the profile.
    fn discover(&self) -> Vec<SnapshotLocation> {
        let mut found: Vec<SnapshotLocation> = LEGACY_SNAPSHOT_FILES
            .iter()
            .map(|(name, kind)| SnapshotLocation {
                label: name.to_string(),
                path: self.profile_dir.join(name),
                kind: *kind,
            })
            .filter(|loc| loc.path.is_file())
            .collect();
        found.extend(self.discover_sessions_dir());
        found
    }

    /// Decodes every file of `kind` in `locations`; failures are kept as candidates.
    fn decode(&self, locations: &[SnapshotLocation], kind: SnapshotKind) -> Vec<SnapshotCandidate> {
        locations
            .iter()
            .filter(|loc| loc.kind == kind)
            .map(|loc| {
                let modified = fs::metadata(&loc.path).and_then(|m| m.modified()).ok();
                let outcome = snapshot::decode_snapshot_file(&loc.path).map(|mut decoded| {
                    decoded.session.source = Some(loc.label.clone());
                    decoded
                });
                SnapshotCandidate::new(loc.label.clone(), outcome).with_modified(modified)
            })
            .collect()
    }

    /// Recovers open tabs, falling back to the closed-tabs files only when
    /// no session file has any window. The profile is scanned once.
    fn recover_tabs(&self) -> AggregatedRecovery {
        let locations = self.discover();
        let mut recovery = aggregate(self.decode(&locations, SnapshotKind::Session));
        if recovery.chosen.is_some() {
            return recovery;
        }

        let fallback = aggregate(self.decode(&locations, SnapshotKind::Tabs));
        recovery.failures.extend(fallback.failures);
        recovery.examined += fallback.examined;
        if fallback.chosen.is_some() {
            recovery.session = fallback.session;
            recovery.anomalies = fallback.anomalies;
            recovery.chosen = fallback.chosen;
        }
        recovery
    }

    fn has_snapshots(&self) -> bool {
        !self.discover().is_empty()
    }
}
