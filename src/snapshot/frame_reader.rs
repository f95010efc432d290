//! Snapshot header validation and record framing.
//!
//! A snapshot starts with the `SNSS` signature and a little-endian `i32`
//! version. Version 4 files follow it with a `u64` save time (unix
//! milliseconds). The version selects the record framing:
//!
//! ```text
//! v1, v3:  size: u16 (counts the tag) | tag: u8 | payload: [u8; size - 1]
//! v4:      len:  u32 (excludes tag)   | tag: u8 | payload: [u8; len]
//! ```
//!
//! A record that cannot be read in full ends the stream. This is what a
//! crash during a write leaves behind, so it is not reported as an error.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::iter::FusedIterator;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::types::errors::FormatError;
use crate::types::snapshot::{Framing, RawRecord, SnapshotHeader, SnapshotVersion};

/// File signature: "SNSS".
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"SNSS";

/// Magic plus version.
pub const BASE_HEADER_LEN: usize = 8;

/// Base header plus the v4 save time.
pub const WIDE_HEADER_LEN: usize = 16;

/// Reads and validates the header, leaving `reader` at the first record.
pub fn read_header<R: Read>(reader: &mut R) -> Result<SnapshotHeader, FormatError> {
    let mut base = [0u8; BASE_HEADER_LEN];
    let got = read_up_to(reader, &mut base)?;

    if got >= SNAPSHOT_MAGIC.len() && base[..4] != SNAPSHOT_MAGIC {
        return Err(FormatError::BadMagic([base[0], base[1], base[2], base[3]]));
    }
    if got < BASE_HEADER_LEN {
        return Err(FormatError::TruncatedHeader {
            expected: BASE_HEADER_LEN,
            actual: got,
        });
    }

    let raw_version = i32::from_le_bytes([base[4], base[5], base[6], base[7]]);
    let version =
        SnapshotVersion::from_raw(raw_version).ok_or(FormatError::UnsupportedVersion(raw_version))?;

    let saved_at_ms = match version.framing() {
        Framing::Compact => None,
        Framing::Wide => {
            let mut stamp = [0u8; 8];
            let got = read_up_to(reader, &mut stamp)?;
            if got < stamp.len() {
                return Err(FormatError::TruncatedHeader {
                    expected: WIDE_HEADER_LEN,
                    actual: BASE_HEADER_LEN + got,
                });
            }
            Some(i64::from_le_bytes(stamp))
        }
    };

    Ok(SnapshotHeader {
        version,
        saved_at_ms,
    })
}

/// Fills as much of `buf` as the reader can supply, returning the count.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, FormatError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FormatError::Io(e.to_string())),
        }
    }
    Ok(filled)
}

/// Lazy sequence of [`RawRecord`]s following a validated header.
///
/// The sequence is finite and cannot be restarted.
pub struct FrameReader<R> {
    reader: R,
    header: SnapshotHeader,
    finished: bool,
    records_read: usize,
}

impl FrameReader<BufReader<File>> {
    /// Opens a snapshot file read-only and validates its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
        let file = File::open(path.as_ref()).map_err(|e| {
            FormatError::Io(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> FrameReader<R> {
    /// Validates the header of `reader` and positions at the first record.
    pub fn new(mut reader: R) -> Result<Self, FormatError> {
        let header = read_header(&mut reader)?;
        Ok(Self {
            reader,
            header,
            finished: false,
            records_read: 0,
        })
    }

    pub fn header(&self) -> SnapshotHeader {
        self.header
    }

    /// Number of complete records yielded so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Reads one record. `Ok(None)` marks a clean stop.
    fn read_record(&mut self) -> io::Result<Option<RawRecord>> {
        let (tag, len) = match self.header.version.framing() {
            Framing::Compact => {
                let size = self.reader.read_u16::<LittleEndian>()?;
                if size == 0 {
                    return Ok(None);
                }
                let tag = self.reader.read_u8()?;
                (tag, usize::from(size) - 1)
            }
            Framing::Wide => {
                let len = self.reader.read_u32::<LittleEndian>()?;
                let tag = self.reader.read_u8()?;
                (tag, len as usize)
            }
        };

        // Bounded by the bytes actually present, so a bogus length cannot
        // trigger a huge allocation.
        let mut payload = Vec::new();
        (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut payload)?;
        if payload.len() < len {
            return Ok(None);
        }

        Ok(Some(RawRecord { tag, payload }))
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = RawRecord;

    fn next(&mut self) -> Option<RawRecord> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => {
                self.records_read += 1;
                Some(record)
            }
            Ok(None) => {
                tracing::trace!(records = self.records_read, "snapshot stream ended");
                self.finished = true;
                None
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::trace!(records = self.records_read, "snapshot stream ended");
                self.finished = true;
                None
            }
            Err(e) => {
                tracing::warn!(
                    records = self.records_read,
                    error = %e,
                    "read error inside snapshot, keeping records read so far"
                );
                self.finished = true;
                None
            }
        }
    }
}

impl<R: Read> FusedIterator for FrameReader<R> {}
