//! Integration tests for SMF parsing and timeline encoding
//!
//! These tests build Standard MIDI File byte streams by hand and verify
//! the parsed song model and the encoded output rows.

use midinotes::error::Error;
use midinotes::freq::NoteTable;
use midinotes::smf::{self, EventKind, Song};
use midinotes::timeline::{self, Timeline};

/// Canonical VLQ encoding, for building test input.
fn vlq(mut value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.insert(0, (value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes
}

/// Wrap a chunk body with its tag and big-endian length.
fn chunk(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut bytes = tag.to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn header_chunk(format: u16, num_tracks: u16, division: u16) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&format.to_be_bytes());
    body.extend_from_slice(&num_tracks.to_be_bytes());
    body.extend_from_slice(&division.to_be_bytes());
    chunk(b"MThd", &body)
}

/// Track body builder: (delta, event bytes) pairs plus End of Track.
fn track_chunk(items: &[(u32, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (delta, event) in items {
        body.extend_from_slice(&vlq(*delta));
        body.extend_from_slice(event);
    }
    body.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    chunk(b"MTrk", &body)
}

fn parse_and_encode(data: &[u8]) -> (Song, Timeline) {
    let table = NoteTable::new();
    let song = smf::parse("test.mid", data).expect("parse failed");
    let timeline = timeline::encode(&song, &table);
    (song, timeline)
}

#[test]
fn test_single_note_scenario() {
    let mut data = header_chunk(0, 1, 480);
    data.extend(track_chunk(&[
        (0, &[0x90, 60, 64]),
        (480, &[0x80, 60, 0]),
    ]));

    let (song, timeline) = parse_and_encode(&data);

    let header = song.header.expect("header missing");
    assert_eq!(header.format, 0);
    assert_eq!(header.division, 480);
    assert!(!header.smpte);
    assert_eq!(song.track_count, 1);
    assert_eq!(song.tracks[0].events.len(), 2);
    assert!(song.errors.is_empty());

    // NoteOn at delta 0 emits nothing; NoteOff at tick 480 emits one row
    // scaled by 0.5 with middle C still sounding
    let c4 = NoteTable::new().find_by_number(60).counter;
    assert_eq!(timeline.song_length(), 1);
    assert_eq!(timeline.rows[0].delta, 240);
    assert_eq!(timeline.rows[0].voices, [c4, 0, 0, 0]);
}

#[test]
fn test_running_status_reuses_previous_event() {
    let mut data = header_chunk(0, 1, 480);
    // second and third events omit the status byte
    data.extend(track_chunk(&[
        (0, &[0x93, 60, 64]),
        (10, &[62, 64]),
        (10, &[64, 64]),
    ]));

    let (song, _) = parse_and_encode(&data);

    let events = &song.tracks[0].events;
    assert_eq!(events.len(), 3);
    for (event, expected_key) in events.iter().zip([60u8, 62, 64]) {
        assert_eq!(event.kind, EventKind::NoteOn);
        assert_eq!(event.channel, 3);
        assert_eq!(event.key, expected_key);
    }
    assert_eq!(events[2].time, 20);
}

#[test]
fn test_track_name_meta() {
    let mut data = header_chunk(0, 1, 480);
    data.extend(track_chunk(&[
        (0, &[0xFF, 0x03, 5, b'P', b'i', b'a', b'n', b'o']),
        (0, &[0x90, 60, 64]),
    ]));

    let (song, _) = parse_and_encode(&data);

    assert_eq!(song.tracks[0].name.as_deref(), Some("Piano"));
    assert_eq!(song.tracks[0].events.len(), 1);
}

#[test]
fn test_later_track_name_overwrites() {
    let mut data = header_chunk(0, 1, 480);
    data.extend(track_chunk(&[
        (0, &[0xFF, 0x03, 3, b'o', b'l', b'd']),
        (0, &[0xFF, 0x03, 3, b'n', b'e', b'w']),
    ]));

    let (song, _) = parse_and_encode(&data);

    assert_eq!(song.tracks[0].name.as_deref(), Some("new"));
}

#[test]
fn test_sysex_and_unrecorded_events_are_skipped() {
    let mut data = header_chunk(0, 1, 480);
    data.extend(track_chunk(&[
        // SysEx body consumed through the trailing 0xF7
        (0, &[0xF0, 0x01, 0x02, 0x03, 0xF7]),
        // control change, program change, pitch wheel: decoded, unrecorded
        (0, &[0xB0, 7, 100]),
        (0, &[0xC0, 42]),
        (0, &[0xE0, 0x00, 0x40]),
        // tempo meta (unhandled type): length-skipped
        (0, &[0xFF, 0x51, 3, 0x07, 0xA1, 0x20]),
        (10, &[0x90, 60, 64]),
    ]));

    let (song, _) = parse_and_encode(&data);

    assert!(song.errors.is_empty());
    let events = &song.tracks[0].events;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].time, 10);
}

#[test]
fn test_unknown_chunk_is_recoverable() {
    let mut data = header_chunk(0, 1, 480);
    data.extend(chunk(b"XFIH", &[1, 2, 3, 4, 5]));
    data.extend(track_chunk(&[(0, &[0x90, 60, 64])]));

    let (song, _) = parse_and_encode(&data);

    assert_eq!(song.errors.len(), 1);
    assert!(song.errors[0].contains("XFIH"));
    // parsing continued past the skipped chunk
    assert_eq!(song.track_count, 1);
    assert_eq!(song.tracks[0].events.len(), 1);
}

#[test]
fn test_unknown_event_halts_only_current_track() {
    let mut data = header_chunk(0, 3, 480);
    data.extend(track_chunk(&[
        (0, &[0x90, 60, 64]),
        (480, &[0x80, 60, 0]),
    ]));
    // delta 0 followed by a data byte with no running status to fall
    // back on: this track must halt immediately
    let body: Vec<u8> = [vlq(0), vec![0x00]].concat();
    data.extend(chunk(b"MTrk", &body));
    data.extend(track_chunk(&[(0, &[0x91, 62, 64])]));

    let (song, _) = parse_and_encode(&data);

    assert_eq!(song.errors.len(), 1);
    assert!(song.errors[0].contains("0x00"), "error: {}", song.errors[0]);
    assert!(song.errors[0].contains("offset"), "error: {}", song.errors[0]);
    // the previously parsed track is intact, the halted track is
    // committed as gathered, and the outer chunk loop kept going
    assert_eq!(song.track_count, 3);
    assert_eq!(song.tracks.len(), 3);
    assert_eq!(song.tracks[0].events.len(), 2);
    assert_eq!(song.tracks[1].events.len(), 0);
    assert_eq!(song.tracks[2].events.len(), 1);
    assert_eq!(song.tracks[2].events[0].channel, 1);
}

#[test]
fn test_smpte_division_flag() {
    let data = header_chunk(0, 0, 0x8000 | 0x1234);

    let song = smf::parse("smpte.mid", &data).expect("parse failed");

    let header = song.header.expect("header missing");
    assert!(header.smpte);
    assert_eq!(header.division, 0x1234);
}

#[test]
fn test_truncated_file_is_fatal() {
    // header chunk claims 6 bytes but the buffer ends after 2
    let mut data = b"MThd".to_vec();
    data.extend_from_slice(&6u32.to_be_bytes());
    data.extend_from_slice(&[0x00, 0x00]);

    let result = smf::parse("short.mid", &data);
    assert!(matches!(result, Err(Error::OutOfBounds { .. })));
}

#[test]
fn test_truncated_sysex_is_fatal() {
    let mut data = header_chunk(0, 1, 480);
    // SysEx with no terminating 0xF7 before the chunk (and buffer) ends
    let body: Vec<u8> = [vlq(0), vec![0xF0, 0x01, 0x02]].concat();
    data.extend(chunk(b"MTrk", &body));

    let result = smf::parse("sysex.mid", &data);
    assert!(matches!(result, Err(Error::OutOfBounds { .. })));
}

#[test]
fn test_multi_track_merge_is_deterministic() {
    let mut data = header_chunk(1, 2, 480);
    data.extend(track_chunk(&[
        (0, &[0x90, 64, 64]),
        (480, &[0x80, 64, 0]),
    ]));
    data.extend(track_chunk(&[
        (0, &[0x90, 60, 64]),
        (480, &[0x80, 60, 0]),
    ]));

    let (song, timeline) = parse_and_encode(&data);

    assert_eq!(song.track_count, 2);
    // both releases land at tick 480; track 0's emits the one row with
    // both notes still sounding, in ascending key order
    let table = NoteTable::new();
    assert_eq!(timeline.song_length(), 1);
    assert_eq!(
        timeline.rows[0].voices,
        [
            table.find_by_number(60).counter,
            table.find_by_number(64).counter,
            0,
            0
        ]
    );
}

#[test]
fn test_zero_velocity_note_on_is_recorded_as_note_on() {
    let mut data = header_chunk(0, 1, 480);
    data.extend(track_chunk(&[
        (0, &[0x90, 60, 64]),
        (480, &[0x90, 60, 0]),
    ]));

    let (song, timeline) = parse_and_encode(&data);

    let events = &song.tracks[0].events;
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, EventKind::NoteOn);
    assert_eq!(events[1].velocity, 0);
    // it occupies a second voice rather than releasing the first
    assert_eq!(timeline.zero_velocity_note_ons, 1);
    assert_eq!(timeline.note_off_count, 0);
}

#[test]
fn test_parse_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.mid");

    let mut data = header_chunk(0, 1, 480);
    data.extend(track_chunk(&[
        (0, &[0x90, 60, 64]),
        (480, &[0x80, 60, 0]),
    ]));
    std::fs::write(&path, &data).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let song = smf::parse(path.display().to_string(), &bytes).expect("parse failed");

    assert_eq!(song.track_count, 1);
    assert_eq!(song.event_count(), 2);
}
