//! Recovery aggregator.
//!
//! Picks one snapshot per profile. Windows and tabs are never merged across
//! files: ids are scoped to the file that wrote them, so two files can
//! reuse the same id for unrelated tabs.

use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::errors::FormatError;
use crate::types::session::RecoveredSession;
use crate::types::snapshot::Anomaly;

use super::DecodedSnapshot;

/// One snapshot file offered to the aggregator.
#[derive(Debug, Clone)]
pub struct SnapshotCandidate {
    pub label: String,
    /// File modification time, used when the header has no save time.
    pub modified: Option<SystemTime>,
    pub outcome: Result<DecodedSnapshot, FormatError>,
}

impl SnapshotCandidate {
    pub fn new(label: impl Into<String>, outcome: Result<DecodedSnapshot, FormatError>) -> Self {
        Self {
            label: label.into(),
            modified: None,
            outcome,
        }
    }

    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }

    /// Header save time if declared, otherwise the file modification time.
    pub fn saved_at_ms(&self) -> Option<i64> {
        let declared = self
            .outcome
            .as_ref()
            .ok()
            .and_then(|d| d.header.saved_at_ms);
        declared.or_else(|| {
            self.modified
                .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
                .and_then(|d| i64::try_from(d.as_millis()).ok())
        })
    }

    fn window_count(&self) -> usize {
        self.outcome
            .as_ref()
            .map_or(0, |d| d.session.windows.len())
    }
}

/// The session chosen for a profile, with diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedRecovery {
    pub session: RecoveredSession,
    /// Label of the chosen candidate, `None` when nothing was usable.
    pub chosen: Option<String>,
    /// Anomalies of the chosen candidate.
    pub anomalies: Vec<Anomaly>,
    /// Candidates that failed to open or had an invalid header.
    pub failures: Vec<(String, FormatError)>,
    /// Number of candidates looked at, failed ones included.
    pub examined: usize,
}

impl AggregatedRecovery {
    /// Whether at least one candidate decoded, with or without windows.
    pub fn any_decoded(&self) -> bool {
        self.failures.len() < self.examined
    }
}

/// Orders candidates most recent first and returns the first with windows.
///
/// Candidates without any known save time keep their given order after
/// the timed ones.
pub fn aggregate(candidates: Vec<SnapshotCandidate>) -> AggregatedRecovery {
    let mut ordered = candidates;
    ordered.sort_by(|a, b| match (a.saved_at_ms(), b.saved_at_ms()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let mut recovery = AggregatedRecovery {
        examined: ordered.len(),
        ..AggregatedRecovery::default()
    };
    for candidate in ordered {
        if recovery.chosen.is_none() && candidate.window_count() > 0 {
            if let Ok(decoded) = candidate.outcome {
                tracing::info!(
                    source = %candidate.label,
                    windows = decoded.session.windows.len(),
                    tabs = decoded.session.tab_count(),
                    "recovering tabs from snapshot"
                );
                recovery.session = decoded.session;
                recovery.anomalies = decoded.anomalies;
                recovery.chosen = Some(candidate.label);
            }
            continue;
        }
        match candidate.outcome {
            Err(e) => {
                tracing::warn!(source = %candidate.label, error = %e, "snapshot unusable");
                recovery.failures.push((candidate.label, e));
            }
            Ok(_) => {
                tracing::debug!(source = %candidate.label, "snapshot not used");
            }
        }
    }

    recovery
}
