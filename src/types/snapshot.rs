use std::fmt;

use serde::{Deserialize, Serialize};

/// Format versions the frame reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotVersion {
    /// Original layout written by older browser builds.
    V1,
    /// Layout written by current browser builds.
    V3,
    /// Wide-frame layout with a save time in the header.
    V4,
}

impl SnapshotVersion {
    /// Maps the raw header field to a known version.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::V1),
            3 => Some(Self::V3),
            4 => Some(Self::V4),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Self::V1 => 1,
            Self::V3 => 3,
            Self::V4 => 4,
        }
    }

    pub fn framing(self) -> Framing {
        match self {
            Self::V1 | Self::V3 => Framing::Compact,
            Self::V4 => Framing::Wide,
        }
    }

    /// Legacy versions store the selected tab as a position and omit the
    /// tab's index from its creation record.
    pub fn is_legacy(self) -> bool {
        self.framing() == Framing::Compact
    }
}

/// How each record's length prefix is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `u16` size that counts the tag byte.
    Compact,
    /// `u32` length that excludes the tag byte.
    Wide,
}

/// Validated file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub version: SnapshotVersion,
    /// Save time declared in the header, unix milliseconds. Only wide files carry it.
    pub saved_at_ms: Option<i64>,
}

/// One length-prefixed record as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub tag: u8,
    pub payload: Vec<u8>,
}

/// Typed interpretation of a [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    WindowCreated {
        window_id: i32,
    },
    WindowClosed {
        window_id: i32,
    },
    TabCreated {
        window_id: i32,
        tab_id: i32,
        index_in_window: i32,
    },
    TabMoved {
        tab_id: i32,
        index_in_window: i32,
    },
    TabClosed {
        tab_id: i32,
    },
    TabPinned {
        tab_id: i32,
        pinned: bool,
    },
    NavigationEntryAdded {
        tab_id: i32,
        nav_index: i32,
        url: String,
        title: String,
    },
    /// Keep only the first `count` entries of the tab's stack.
    NavigationPruned {
        tab_id: i32,
        count: i32,
    },
    ActiveTabSet {
        window_id: i32,
        tab_id: i32,
    },
    ActiveTabIndexSet {
        window_id: i32,
        tab_index: i32,
    },
    ActiveNavigationIndexSet {
        tab_id: i32,
        nav_index: i32,
    },
    /// Unrecognised or undecodable record. The payload itself is not kept.
    Unknown {
        tag: u8,
        payload_len: usize,
    },
}

/// A non-fatal inconsistency found while decoding one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    UnknownCommand { tag: u8, payload_len: usize },
    ShortPayload { tag: u8, expected: usize, actual: usize },
    MalformedPayload { tag: u8 },
    MalformedText { tag: u8, field: String },
    DuplicateWindow { window_id: i32 },
    DuplicateTab { tab_id: i32 },
    UnknownWindow { window_id: i32 },
    UnknownTab { tab_id: i32 },
    ClosedWindowReference { window_id: i32 },
    ClosedTabReference { tab_id: i32 },
    NavigationIndexOutOfRange { tab_id: i32, nav_index: i32, len: usize },
    NavigationPointerClamped { tab_id: i32, requested: i32, clamped: usize },
    ActiveTabClamped { window_id: i32, requested: i32, clamped: usize },
    ActiveTabMissing { window_id: i32, tab_id: i32 },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::UnknownCommand { tag, payload_len } => {
                write!(f, "Unknown command tag {} ({} payload bytes)", tag, payload_len)
            }
            Anomaly::ShortPayload { tag, expected, actual } => write!(
                f,
                "Short payload for tag {}: expected at least {} bytes, got {}",
                tag, expected, actual
            ),
            Anomaly::MalformedPayload { tag } => write!(f, "Malformed payload for tag {}", tag),
            Anomaly::MalformedText { tag, field } => {
                write!(f, "Malformed text in field '{}' of tag {}", field, tag)
            }
            Anomaly::DuplicateWindow { window_id } => {
                write!(f, "Duplicate creation of window {}", window_id)
            }
            Anomaly::DuplicateTab { tab_id } => write!(f, "Duplicate creation of tab {}", tab_id),
            Anomaly::UnknownWindow { window_id } => {
                write!(f, "Reference to unknown window {}", window_id)
            }
            Anomaly::UnknownTab { tab_id } => write!(f, "Reference to unknown tab {}", tab_id),
            Anomaly::ClosedWindowReference { window_id } => {
                write!(f, "Reference to closed window {}", window_id)
            }
            Anomaly::ClosedTabReference { tab_id } => {
                write!(f, "Reference to closed tab {}", tab_id)
            }
            Anomaly::NavigationIndexOutOfRange { tab_id, nav_index, len } => write!(
                f,
                "Navigation index {} out of range for tab {} ({} entries)",
                nav_index, tab_id, len
            ),
            Anomaly::NavigationPointerClamped { tab_id, requested, clamped } => write!(
                f,
                "Current navigation index {} of tab {} clamped to {}",
                requested, tab_id, clamped
            ),
            Anomaly::ActiveTabClamped { window_id, requested, clamped } => write!(
                f,
                "Active tab index {} of window {} clamped to {}",
                requested, window_id, clamped
            ),
            Anomaly::ActiveTabMissing { window_id, tab_id } => write!(
                f,
                "Active tab {} is no longer in window {}, using the first tab",
                tab_id, window_id
            ),
        }
    }
}
