//! Snapshot encoder, the counterpart of [`super::frame_reader`].
//!
//! Produces byte-exact snapshot files for fixtures and diagnostics. Record
//! helpers follow the payload shapes of the chosen version, so the same
//! sequence of calls yields a legacy or a wide file.

use crate::types::snapshot::{Framing, SnapshotVersion};

use super::command_decoder::{
    TAG_NAVIGATION_PRUNED, TAG_SET_PINNED_STATE, TAG_SET_SELECTED_NAVIGATION_INDEX,
    TAG_SET_SELECTED_TAB, TAG_SET_TAB_INDEX_IN_WINDOW, TAG_SET_TAB_WINDOW, TAG_SET_WINDOW_TYPE,
    TAG_TAB_CLOSED, TAG_UPDATE_TAB_NAVIGATION, TAG_WINDOW_CLOSED,
};
use super::frame_reader::SNAPSHOT_MAGIC;

/// Builds a snapshot file in memory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    version: SnapshotVersion,
    saved_at_ms: i64,
    body: Vec<u8>,
}

impl SnapshotWriter {
    pub fn new(version: SnapshotVersion) -> Self {
        Self {
            version,
            saved_at_ms: 0,
            body: Vec::new(),
        }
    }

    /// Sets the header save time. Only wide files store it.
    pub fn saved_at(&mut self, saved_at_ms: i64) -> &mut Self {
        self.saved_at_ms = saved_at_ms;
        self
    }

    /// Appends one framed record.
    ///
    /// Legacy frames hold at most `u16::MAX - 1` payload bytes; longer
    /// payloads are cut to fit.
    pub fn record(&mut self, tag: u8, payload: &[u8]) -> &mut Self {
        match self.version.framing() {
            Framing::Compact => {
                let payload = &payload[..payload.len().min(usize::from(u16::MAX) - 1)];
                let size = (payload.len() + 1) as u16;
                self.body.extend_from_slice(&size.to_le_bytes());
                self.body.push(tag);
                self.body.extend_from_slice(payload);
            }
            Framing::Wide => {
                self.body
                    .extend_from_slice(&(payload.len() as u32).to_le_bytes());
                self.body.push(tag);
                self.body.extend_from_slice(payload);
            }
        }
        self
    }

    fn ints(&mut self, tag: u8, fields: &[i32]) -> &mut Self {
        let payload: Vec<u8> = fields.iter().flat_map(|f| f.to_le_bytes()).collect();
        self.record(tag, &payload)
    }

    pub fn window_created(&mut self, window_id: i32) -> &mut Self {
        // The second field is the window type; 0 is a normal window.
        self.ints(TAG_SET_WINDOW_TYPE, &[window_id, 0])
    }

    pub fn window_closed(&mut self, window_id: i32) -> &mut Self {
        self.closed(TAG_WINDOW_CLOSED, window_id)
    }

    /// Legacy files state the position in a separate record.
    pub fn tab_created(&mut self, window_id: i32, tab_id: i32, index_in_window: i32) -> &mut Self {
        if self.version.is_legacy() {
            self.ints(TAG_SET_TAB_WINDOW, &[window_id, tab_id]);
            self.tab_moved(tab_id, index_in_window)
        } else {
            self.ints(TAG_SET_TAB_WINDOW, &[window_id, tab_id, index_in_window])
        }
    }

    pub fn tab_moved(&mut self, tab_id: i32, index_in_window: i32) -> &mut Self {
        self.ints(TAG_SET_TAB_INDEX_IN_WINDOW, &[tab_id, index_in_window])
    }

    pub fn tab_closed(&mut self, tab_id: i32) -> &mut Self {
        self.closed(TAG_TAB_CLOSED, tab_id)
    }

    pub fn tab_pinned(&mut self, tab_id: i32, pinned: bool) -> &mut Self {
        let mut payload = tab_id.to_le_bytes().to_vec();
        payload.extend_from_slice(&[u8::from(pinned), 0, 0, 0]);
        self.record(TAG_SET_PINNED_STATE, &payload)
    }

    /// Id, padding, then a close time the reader ignores.
    fn closed(&mut self, tag: u8, id: i32) -> &mut Self {
        let mut payload = id.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0; 4]);
        payload.extend_from_slice(&0i64.to_le_bytes());
        self.record(tag, &payload)
    }

    pub fn navigation(&mut self, tab_id: i32, nav_index: i32, url: &str, title: &str) -> &mut Self {
        let mut body = Vec::new();
        body.extend_from_slice(&tab_id.to_le_bytes());
        body.extend_from_slice(&nav_index.to_le_bytes());
        push_string(&mut body, url.as_bytes(), url.len());
        let units: Vec<u8> = title.encode_utf16().flat_map(u16::to_le_bytes).collect();
        push_string(&mut body, &units, units.len() / 2);
        // Page state and transition type, which the reader skips.
        push_string(&mut body, &[], 0);
        body.extend_from_slice(&0i32.to_le_bytes());
        self.pickled(TAG_UPDATE_TAB_NAVIGATION, &body)
    }

    /// Navigation record whose title is given as raw UTF-16 code units.
    pub fn navigation_utf16(
        &mut self,
        tab_id: i32,
        nav_index: i32,
        url: &str,
        title_units: &[u16],
    ) -> &mut Self {
        let mut body = Vec::new();
        body.extend_from_slice(&tab_id.to_le_bytes());
        body.extend_from_slice(&nav_index.to_le_bytes());
        push_string(&mut body, url.as_bytes(), url.len());
        let units: Vec<u8> = title_units.iter().flat_map(|u| u.to_le_bytes()).collect();
        push_string(&mut body, &units, title_units.len());
        self.pickled(TAG_UPDATE_TAB_NAVIGATION, &body)
    }

    fn pickled(&mut self, tag: u8, body: &[u8]) -> &mut Self {
        let mut payload = (body.len() as u32).to_le_bytes().to_vec();
        payload.extend_from_slice(body);
        self.record(tag, &payload)
    }

    pub fn navigation_pruned(&mut self, tab_id: i32, count: i32) -> &mut Self {
        self.ints(TAG_NAVIGATION_PRUNED, &[tab_id, count])
    }

    pub fn active_navigation(&mut self, tab_id: i32, nav_index: i32) -> &mut Self {
        self.ints(TAG_SET_SELECTED_NAVIGATION_INDEX, &[tab_id, nav_index])
    }

    /// Selected tab by id. Legacy readers treat the value as a position.
    pub fn active_tab(&mut self, window_id: i32, tab_id: i32) -> &mut Self {
        self.ints(TAG_SET_SELECTED_TAB, &[window_id, tab_id])
    }

    /// Selected tab by position, the legacy shape.
    pub fn active_tab_index(&mut self, window_id: i32, tab_index: i32) -> &mut Self {
        self.ints(TAG_SET_SELECTED_TAB, &[window_id, tab_index])
    }

    /// Header followed by every record written so far.
    pub fn finish(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + self.body.len());
        out.extend_from_slice(&SNAPSHOT_MAGIC);
        out.extend_from_slice(&self.version.as_raw().to_le_bytes());
        if self.version.framing() == Framing::Wide {
            out.extend_from_slice(&self.saved_at_ms.to_le_bytes());
        }
        out.extend_from_slice(&self.body);
        out
    }
}

/// Length-prefixed, 4-byte padded pickle string.
fn push_string(body: &mut Vec<u8>, data: &[u8], declared_len: usize) {
    body.extend_from_slice(&(declared_len as i32).to_le_bytes());
    body.extend_from_slice(data);
    let padding = (4 - data.len() % 4) % 4;
    body.extend(std::iter::repeat(0u8).take(padding));
}
