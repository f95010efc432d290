//! Session snapshot decoding.
//!
//! Each stage depends only on the one before it:
//!
//! ```text
//! frame_reader -> command_decoder -> reconstructor -> aggregator
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use profile_recovery::snapshot::decode_snapshot_file;
//!
//! let decoded = decode_snapshot_file("Default/Current Session").expect("unreadable snapshot");
//! for window in &decoded.session.windows {
//!     println!("window {} has {} tabs", window.window_id, window.tabs.len());
//! }
//! ```

pub mod aggregator;
pub mod command_decoder;
pub mod frame_reader;
pub mod pickle;
pub mod reconstructor;
pub mod writer;

use std::io::Read;
use std::path::Path;

use crate::types::errors::FormatError;
use crate::types::session::RecoveredSession;
use crate::types::snapshot::{Anomaly, SnapshotHeader};

pub use aggregator::{aggregate, AggregatedRecovery, SnapshotCandidate};
pub use frame_reader::FrameReader;
pub use reconstructor::{reconstruct, SessionReconstructor};
pub use writer::SnapshotWriter;

/// Everything recovered from one snapshot file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSnapshot {
    pub header: SnapshotHeader,
    pub session: RecoveredSession,
    pub anomalies: Vec<Anomaly>,
    /// Complete records read before the stream ended.
    pub records: usize,
}

/// Runs the full pipeline over a byte stream.
///
/// Only a bad header fails; anything wrong inside the stream is absorbed
/// into [`DecodedSnapshot::anomalies`].
pub fn decode_snapshot<R: Read>(reader: R, label: &str) -> Result<DecodedSnapshot, FormatError> {
    decode_frames(FrameReader::new(reader)?, label)
}

/// Opens `path` read-only and decodes it, labelled with its file name.
pub fn decode_snapshot_file<P: AsRef<Path>>(path: P) -> Result<DecodedSnapshot, FormatError> {
    let path = path.as_ref();
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    decode_frames(FrameReader::open(path)?, &label)
}

fn decode_frames<R: Read>(
    mut frames: FrameReader<R>,
    label: &str,
) -> Result<DecodedSnapshot, FormatError> {
    let header = frames.header();
    let mut reconstructor = SessionReconstructor::new();

    for (index, record) in frames.by_ref().enumerate() {
        let decoded = command_decoder::decode_record(&record, header.version);
        for anomaly in decoded.anomalies {
            tracing::debug!(source = label, record = index, %anomaly, "snapshot anomaly");
            reconstructor.note(anomaly);
        }
        let before = reconstructor.anomalies().len();
        reconstructor.apply(decoded.event);
        for anomaly in &reconstructor.anomalies()[before..] {
            tracing::debug!(source = label, record = index, %anomaly, "snapshot anomaly");
        }
    }

    let records = frames.records_read();
    let mut reconstruction = reconstructor.finish();
    reconstruction.session.source = Some(label.to_string());

    tracing::debug!(
        source = label,
        version = header.version.as_raw(),
        records,
        windows = reconstruction.session.windows.len(),
        tabs = reconstruction.session.tab_count(),
        anomalies = reconstruction.anomalies.len(),
        "decoded snapshot"
    );

    Ok(DecodedSnapshot {
        header,
        session: reconstruction.session,
        anomalies: reconstruction.anomalies,
        records,
    })
}
