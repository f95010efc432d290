//! App Core for profile recovery.
//!
//! Central struct holding the profile's managers and the recovery settings.
//! Recovers tabs, bookmarks and history independently and writes the outputs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::database::connection::Database;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait, BOOKMARKS_FILE};
use crate::managers::history_manager::{HistoryManager, HistoryManagerTrait, HISTORY_FILE};
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::services::bookmark_export;
use crate::services::dashboard_renderer::DashboardRenderer;
use crate::types::errors::{HistoryError, ProfileError, RecoveryError, RenderError};
use crate::types::history::HistoryEntry;
use crate::types::profile::RecoveredProfile;
use crate::types::session::RecoveredSession;
use crate::types::settings::RecoverySettings;

/// Central application struct.
///
/// HistoryManager is created on demand because it borrows the connection of
/// a database copy that only lives for the duration of the read.
pub struct App {
    profile_dir: PathBuf,
    pub settings: RecoverySettings,
    pub session_manager: SessionManager,
    pub bookmark_manager: BookmarkManager,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RecoveryReport {
    pub profile: RecoveredProfile,
    pub dashboard_path: PathBuf,
    /// `None` when no bookmarks were recovered.
    pub bookmarks_path: Option<PathBuf>,
    /// Snapshot anomalies seen in the chosen session file.
    pub anomaly_count: usize,
    pub include_internal_urls: bool,
}

impl RecoveryReport {
    pub fn summary(&self) -> String {
        self.profile.summary(self.include_internal_urls)
    }
}

impl App {
    /// Creates a new App for `profile_dir` after checking that it looks like a profile.
    pub fn new<P: AsRef<Path>>(profile_dir: P, settings: RecoverySettings) -> Result<Self, ProfileError> {
        let profile_dir = profile_dir.as_ref().to_path_buf();
        Self::validate_profile(&profile_dir)?;

        Ok(Self {
            session_manager: SessionManager::new(&profile_dir),
            bookmark_manager: BookmarkManager::new(&profile_dir),
            profile_dir,
            settings,
        })
    }

    /// A profile is a directory holding `Bookmarks`, `History`, or a session file.
    pub fn validate_profile(dir: &Path) -> Result<(), ProfileError> {
        if !dir.is_dir() {
            return Err(ProfileError::NotADirectory(dir.display().to_string()));
        }
        let has_store = [BOOKMARKS_FILE, HISTORY_FILE]
            .iter()
            .any(|name| dir.join(name).is_file());
        if has_store || SessionManager::new(dir).has_snapshots() {
            Ok(())
        } else {
            Err(ProfileError::NotAProfile(dir.display().to_string()))
        }
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }

    /// Reads the history database through a private copy.
    pub fn recover_history(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let path = self.profile_dir.join(HISTORY_FILE);
        if !path.is_file() {
            return Err(HistoryError::NotFound(path.display().to_string()));
        }
        let db = Database::open_copy(&path).map_err(|e| HistoryError::IoError(e.to_string()))?;
        let entries = HistoryManager::new(db.connection()).list_recent(self.settings.history_limit)?;
        tracing::debug!(entries = entries.len(), "read history database");
        Ok(entries)
    }

    /// Recovers open tabs. `None` when no snapshot file could be decoded.
    pub fn recover_tabs(&self) -> (Option<RecoveredSession>, usize) {
        let recovery = self.session_manager.recover_tabs();
        let anomaly_count = recovery.anomalies.len();
        if recovery.chosen.is_some() || recovery.any_decoded() {
            (Some(recovery.session), anomaly_count)
        } else {
            (None, anomaly_count)
        }
    }

    /// Recovers all three data sets. A failure in one never blocks the others.
    pub fn recover(&self) -> (RecoveredProfile, usize) {
        let (tabs, anomaly_count) = self.recover_tabs();

        let bookmarks = match self.bookmark_manager.load_tree() {
            Ok(tree) => Some(tree),
            Err(e) => {
                tracing::warn!(error = %e, "could not recover bookmarks");
                None
            }
        };

        let history = match self.recover_history() {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(error = %e, "could not recover history");
                None
            }
        };

        (
            RecoveredProfile {
                tabs,
                bookmarks,
                history,
            },
            anomaly_count,
        )
    }

    /// Recovers the profile and writes the dashboard, plus the bookmark
    /// export when bookmarks were found, into `output_dir`.
    pub fn run(&self, output_dir: &Path) -> Result<RecoveryReport, RecoveryError> {
        fs::create_dir_all(output_dir)
            .map_err(|e| RenderError::IoError(format!("{}: {}", output_dir.display(), e)))?;

        let (profile, anomaly_count) = self.recover();

        let dashboard_path = output_dir.join(&self.settings.dashboard_file_name);
        DashboardRenderer::new(&self.settings).write_to(&dashboard_path, &profile)?;

        let bookmarks_path = match &profile.bookmarks {
            Some(tree) if tree.bookmark_count() > 0 => {
                let path = output_dir.join(&self.settings.bookmarks_file_name);
                bookmark_export::write_netscape(&path, tree)?;
                Some(path)
            }
            _ => None,
        };

        Ok(RecoveryReport {
            profile,
            dashboard_path,
            bookmarks_path,
            anomaly_count,
            include_internal_urls: self.settings.include_internal_urls,
        })
    }
}
