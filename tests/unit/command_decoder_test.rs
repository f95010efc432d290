//! Unit tests for record decoding.
//!
//! Records are produced by `SnapshotWriter` and read back through the frame
//! reader, so the tests exercise the same byte layouts a profile holds.

use std::io::Cursor;

use profile_recovery::snapshot::command_decoder::{
    decode_record, TAG_SET_PINNED_STATE, TAG_SET_TAB_WINDOW, TAG_UPDATE_TAB_NAVIGATION,
};
use profile_recovery::snapshot::{FrameReader, SnapshotWriter};
use profile_recovery::types::snapshot::{Anomaly, Event, RawRecord, SnapshotVersion};
use rstest::rstest;

fn decode_all(writer: &SnapshotWriter, version: SnapshotVersion) -> Vec<(Event, Vec<Anomaly>)> {
    FrameReader::new(Cursor::new(writer.finish()))
        .unwrap()
        .map(|record| {
            let decoded = decode_record(&record, version);
            (decoded.event, decoded.anomalies)
        })
        .collect()
}

fn events(writer: &SnapshotWriter, version: SnapshotVersion) -> Vec<Event> {
    decode_all(writer, version).into_iter().map(|(e, _)| e).collect()
}

#[rstest]
#[case(SnapshotVersion::V1)]
#[case(SnapshotVersion::V3)]
#[case(SnapshotVersion::V4)]
fn window_and_tab_lifecycle(#[case] version: SnapshotVersion) {
    let mut w = SnapshotWriter::new(version);
    w.window_created(1)
        .tab_pinned(5, true)
        .tab_closed(5)
        .window_closed(1);

    assert_eq!(
        events(&w, version),
        vec![
            Event::WindowCreated { window_id: 1 },
            Event::TabPinned {
                tab_id: 5,
                pinned: true
            },
            Event::TabClosed { tab_id: 5 },
            Event::WindowClosed { window_id: 1 },
        ]
    );
}

#[test]
fn legacy_tab_creation_is_followed_by_a_move() {
    let mut w = SnapshotWriter::new(SnapshotVersion::V3);
    w.tab_created(1, 7, 2);

    assert_eq!(
        events(&w, SnapshotVersion::V3),
        vec![
            Event::TabCreated {
                window_id: 1,
                tab_id: 7,
                index_in_window: 0
            },
            Event::TabMoved {
                tab_id: 7,
                index_in_window: 2
            },
        ]
    );
}

#[test]
fn wide_tab_creation_carries_the_index() {
    let mut w = SnapshotWriter::new(SnapshotVersion::V4);
    w.tab_created(1, 7, 2);

    assert_eq!(
        events(&w, SnapshotVersion::V4),
        vec![Event::TabCreated {
            window_id: 1,
            tab_id: 7,
            index_in_window: 2
        }]
    );
}

#[test]
fn wide_tab_creation_without_index_is_short() {
    let record = RawRecord {
        tag: TAG_SET_TAB_WINDOW,
        payload: [1i32, 7].iter().flat_map(|v| v.to_le_bytes()).collect(),
    };
    let decoded = decode_record(&record, SnapshotVersion::V4);
    assert_eq!(
        decoded.event,
        Event::Unknown {
            tag: TAG_SET_TAB_WINDOW,
            payload_len: 8
        }
    );
    assert_eq!(
        decoded.anomalies,
        vec![Anomaly::ShortPayload {
            tag: TAG_SET_TAB_WINDOW,
            expected: 12,
            actual: 8
        }]
    );
}

#[test]
fn selected_tab_shape_follows_the_version() {
    let mut legacy = SnapshotWriter::new(SnapshotVersion::V1);
    legacy.active_tab_index(3, 1);
    assert_eq!(
        events(&legacy, SnapshotVersion::V1),
        vec![Event::ActiveTabIndexSet {
            window_id: 3,
            tab_index: 1
        }]
    );

    let mut wide = SnapshotWriter::new(SnapshotVersion::V4);
    wide.active_tab(3, 42);
    assert_eq!(
        events(&wide, SnapshotVersion::V4),
        vec![Event::ActiveTabSet {
            window_id: 3,
            tab_id: 42
        }]
    );
}

#[test]
fn navigation_record_decodes_url_and_title() {
    let mut w = SnapshotWriter::new(SnapshotVersion::V3);
    w.navigation(7, 2, "https://example.org/a?b=c", "Größe – 例え")
        .active_navigation(7, 2)
        .navigation_pruned(7, 1);

    let decoded = decode_all(&w, SnapshotVersion::V3);
    assert_eq!(
        decoded[0],
        (
            Event::NavigationEntryAdded {
                tab_id: 7,
                nav_index: 2,
                url: "https://example.org/a?b=c".to_string(),
                title: "Größe – 例え".to_string(),
            },
            vec![]
        )
    );
    assert_eq!(
        decoded[1].0,
        Event::ActiveNavigationIndexSet {
            tab_id: 7,
            nav_index: 2
        }
    );
    assert_eq!(decoded[2].0, Event::NavigationPruned { tab_id: 7, count: 1 });
}

#[test]
fn unpaired_surrogate_in_title_is_replaced() {
    let mut w = SnapshotWriter::new(SnapshotVersion::V4);
    w.navigation_utf16(1, 0, "https://a", &[0x0041, 0xD800, 0x0042]);

    let decoded = decode_all(&w, SnapshotVersion::V4);
    let (event, anomalies) = &decoded[0];
    match event {
        Event::NavigationEntryAdded { title, .. } => assert_eq!(title, "A\u{FFFD}B"),
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(
        anomalies,
        &vec![Anomaly::MalformedText {
            tag: TAG_UPDATE_TAB_NAVIGATION,
            field: "title".to_string()
        }]
    );
}

#[test]
fn navigation_cut_inside_the_url_is_short() {
    let mut w = SnapshotWriter::new(SnapshotVersion::V4);
    w.navigation(1, 0, "https://example.com/long/path", "Title");
    let record = FrameReader::new(Cursor::new(w.finish()))
        .unwrap()
        .next()
        .unwrap();
    let cut = RawRecord {
        tag: record.tag,
        payload: record.payload[..20].to_vec(),
    };

    let decoded = decode_record(&cut, SnapshotVersion::V4);
    assert_eq!(
        decoded.event,
        Event::Unknown {
            tag: TAG_UPDATE_TAB_NAVIGATION,
            payload_len: 20
        }
    );
    assert!(matches!(
        decoded.anomalies.as_slice(),
        [Anomaly::ShortPayload { tag: TAG_UPDATE_TAB_NAVIGATION, .. }]
    ));
}

#[test]
fn pinned_flag_needs_its_byte() {
    let record = RawRecord {
        tag: TAG_SET_PINNED_STATE,
        payload: 3i32.to_le_bytes().to_vec(),
    };
    let decoded = decode_record(&record, SnapshotVersion::V3);
    assert_eq!(
        decoded.anomalies,
        vec![Anomaly::ShortPayload {
            tag: TAG_SET_PINNED_STATE,
            expected: 5,
            actual: 4
        }]
    );
}

#[rstest]
#[case(1)]
#[case(14)]
#[case(200)]
fn unrecognised_tag_is_unknown(#[case] tag: u8) {
    let record = RawRecord {
        tag,
        payload: vec![0; 6],
    };
    let decoded = decode_record(&record, SnapshotVersion::V3);
    assert_eq!(decoded.event, Event::Unknown { tag, payload_len: 6 });
    assert_eq!(
        decoded.anomalies,
        vec![Anomaly::UnknownCommand { tag, payload_len: 6 }]
    );
}
