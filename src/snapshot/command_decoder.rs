//! Command decoder: one [`RawRecord`] in, one [`Event`] out.
//!
//! Fixed-shape payloads are little-endian `i32` fields. Navigation records
//! are pickled (see [`super::pickle`]). The header version decides the
//! shape of the two records whose layout changed between versions:
//!
//! | tag | event                    | legacy (v1, v3)          | wide (v4)                  |
//! |-----|--------------------------|--------------------------|----------------------------|
//! | 0   | TabCreated               | window, tab              | window, tab, index         |
//! | 8   | ActiveTabIndexSet / Set  | window, tab position     | window, tab id             |
//!
//! Anything that cannot be decoded becomes [`Event::Unknown`] with an
//! anomaly explaining why. Decoding never fails and has no side effects.

use crate::types::snapshot::{Anomaly, Event, RawRecord, SnapshotVersion};

use super::pickle::{PickleError, PickleReader, Text};

pub const TAG_SET_TAB_WINDOW: u8 = 0;
pub const TAG_SET_TAB_INDEX_IN_WINDOW: u8 = 2;
pub const TAG_NAVIGATION_PRUNED: u8 = 5;
pub const TAG_UPDATE_TAB_NAVIGATION: u8 = 6;
pub const TAG_SET_SELECTED_NAVIGATION_INDEX: u8 = 7;
pub const TAG_SET_SELECTED_TAB: u8 = 8;
pub const TAG_SET_WINDOW_TYPE: u8 = 9;
pub const TAG_SET_PINNED_STATE: u8 = 12;
pub const TAG_TAB_CLOSED: u8 = 16;
pub const TAG_WINDOW_CLOSED: u8 = 17;

/// Result of decoding one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCommand {
    pub event: Event,
    pub anomalies: Vec<Anomaly>,
}

impl DecodedCommand {
    fn ok(event: Event) -> Self {
        Self {
            event,
            anomalies: Vec::new(),
        }
    }

    fn unknown(record: &RawRecord, anomaly: Anomaly) -> Self {
        Self {
            event: Event::Unknown {
                tag: record.tag,
                payload_len: record.payload.len(),
            },
            anomalies: vec![anomaly],
        }
    }
}

/// Decodes `record` using the payload shapes of `version`.
pub fn decode_record(record: &RawRecord, version: SnapshotVersion) -> DecodedCommand {
    match decode_event(record, version) {
        Ok(decoded) => decoded,
        Err(anomaly) => DecodedCommand::unknown(record, anomaly),
    }
}

fn decode_event(record: &RawRecord, version: SnapshotVersion) -> Result<DecodedCommand, Anomaly> {
    let tag = record.tag;
    let payload = record.payload.as_slice();

    let event = match tag {
        TAG_SET_TAB_WINDOW => {
            if version.is_legacy() {
                let [window_id, tab_id] = read_ints::<2>(tag, payload)?;
                // Legacy records carry the position in a separate command.
                let index_in_window = read_ints::<3>(tag, payload).map_or(0, |f| f[2]);
                Event::TabCreated {
                    window_id,
                    tab_id,
                    index_in_window,
                }
            } else {
                let [window_id, tab_id, index_in_window] = read_ints::<3>(tag, payload)?;
                Event::TabCreated {
                    window_id,
                    tab_id,
                    index_in_window,
                }
            }
        }
        TAG_SET_TAB_INDEX_IN_WINDOW => {
            let [tab_id, index_in_window] = read_ints::<2>(tag, payload)?;
            Event::TabMoved {
                tab_id,
                index_in_window,
            }
        }
        TAG_NAVIGATION_PRUNED => {
            let [tab_id, count] = read_ints::<2>(tag, payload)?;
            Event::NavigationPruned { tab_id, count }
        }
        TAG_UPDATE_TAB_NAVIGATION => return decode_navigation(record),
        TAG_SET_SELECTED_NAVIGATION_INDEX => {
            let [tab_id, nav_index] = read_ints::<2>(tag, payload)?;
            Event::ActiveNavigationIndexSet { tab_id, nav_index }
        }
        TAG_SET_SELECTED_TAB => {
            let [window_id, value] = read_ints::<2>(tag, payload)?;
            if version.is_legacy() {
                Event::ActiveTabIndexSet {
                    window_id,
                    tab_index: value,
                }
            } else {
                Event::ActiveTabSet {
                    window_id,
                    tab_id: value,
                }
            }
        }
        TAG_SET_WINDOW_TYPE => {
            let [window_id] = read_ints::<1>(tag, payload)?;
            Event::WindowCreated { window_id }
        }
        TAG_SET_PINNED_STATE => {
            let [tab_id] = read_ints::<1>(tag, payload)?;
            let pinned = *payload.get(4).ok_or(Anomaly::ShortPayload {
                tag,
                expected: 5,
                actual: payload.len(),
            })?;
            Event::TabPinned {
                tab_id,
                pinned: pinned != 0,
            }
        }
        TAG_TAB_CLOSED => {
            let [tab_id] = read_ints::<1>(tag, payload)?;
            Event::TabClosed { tab_id }
        }
        TAG_WINDOW_CLOSED => {
            let [window_id] = read_ints::<1>(tag, payload)?;
            Event::WindowClosed { window_id }
        }
        _ => {
            return Err(Anomaly::UnknownCommand {
                tag,
                payload_len: payload.len(),
            })
        }
    };

    Ok(DecodedCommand::ok(event))
}

/// Reads the leading `N` little-endian `i32` fields of a fixed payload.
fn read_ints<const N: usize>(tag: u8, payload: &[u8]) -> Result<[i32; N], Anomaly> {
    let expected = N * 4;
    if payload.len() < expected {
        return Err(Anomaly::ShortPayload {
            tag,
            expected,
            actual: payload.len(),
        });
    }
    let mut out = [0i32; N];
    for (slot, chunk) in out.iter_mut().zip(payload.chunks_exact(4)) {
        *slot = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(out)
}

fn decode_navigation(record: &RawRecord) -> Result<DecodedCommand, Anomaly> {
    let tag = record.tag;
    let as_anomaly = |e: PickleError| match e {
        PickleError::Short { needed, .. } => Anomaly::ShortPayload {
            tag,
            expected: needed,
            actual: record.payload.len(),
        },
        PickleError::NegativeLength => Anomaly::MalformedPayload { tag },
    };

    let mut pickle = PickleReader::new(&record.payload).map_err(as_anomaly)?;
    let tab_id = pickle.read_i32().map_err(as_anomaly)?;
    let nav_index = pickle.read_i32().map_err(as_anomaly)?;
    let url = pickle.read_string().map_err(as_anomaly)?;
    let title = pickle.read_string16().map_err(as_anomaly)?;

    let mut anomalies = Vec::new();
    let mut checked = |field: &str, text: Text| {
        if text.malformed {
            anomalies.push(Anomaly::MalformedText {
                tag,
                field: field.to_string(),
            });
        }
        text.value
    };
    let url = checked("url", url);
    let title = checked("title", title);

    Ok(DecodedCommand {
        event: Event::NavigationEntryAdded {
            tab_id,
            nav_index,
            url,
            title,
        },
        anomalies,
    })
}
