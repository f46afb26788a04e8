//! Timeline merge and output encoding
//!
//! Merges every track's events into one time-ordered sequence and replays
//! it against a bounded set of sounding notes, emitting one output row per
//! audible transition. The sound circuit has four square-wave voices;
//! a fifth simultaneous note is dropped outright, not queued.

use crate::freq::NoteTable;
use crate::smf::{EventKind, MidiEvent, Song};
use serde::Serialize;
use std::collections::BTreeSet;

/// Number of square-wave voices on the target circuit.
pub const VOICES: usize = 4;

/// Scale applied to raw tick deltas before emission.
pub const TIME_SCALE: f32 = 0.5;

/// One output row: a scaled wait followed by the counter value for each
/// sounding voice, in ascending key order, zero-padded to four slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Row {
    pub delta: u32,
    pub voices: [u8; VOICES],
}

/// The encoded performance plus the run's diagnostic counts.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub rows: Vec<Row>,
    pub note_on_count: usize,
    pub note_off_count: usize,
    /// NoteOn events carrying velocity 0. They occupy a voice like any
    /// other NoteOn; the count is surfaced as a diagnostic only.
    pub zero_velocity_note_ons: usize,
}

impl Timeline {
    /// Trailing song-length value: the number of emitted rows.
    pub fn song_length(&self) -> usize {
        self.rows.len()
    }
}

fn make_row(delta: u32, on_notes: &BTreeSet<u8>, table: &NoteTable) -> Row {
    let mut voices = [0u8; VOICES];
    for (slot, &key) in voices.iter_mut().zip(on_notes.iter()) {
        *slot = table.find_by_number(key as i32).counter;
    }
    Row {
        delta: (TIME_SCALE * delta as f32) as u32,
        voices,
    }
}

/// Encode a parsed song into the output row sequence.
///
/// Single left-to-right replay of the merged event list; no lookahead.
pub fn encode(song: &Song, table: &NoteTable) -> Timeline {
    let mut all_events: Vec<MidiEvent> = song
        .tracks
        .iter()
        .flat_map(|t| t.events.iter().copied())
        .collect();

    // ties between simultaneous events break by track index
    all_events.sort_by_key(|e| e.order_key());

    let mut timeline = Timeline::default();
    let mut on_notes: BTreeSet<u8> = BTreeSet::new();
    let mut last_time: u32 = 0;

    for event in &all_events {
        match event.kind {
            EventKind::NoteOn => {
                timeline.note_on_count += 1;
                if event.velocity == 0 {
                    timeline.zero_velocity_note_ons += 1;
                }
                if on_notes.len() < VOICES {
                    on_notes.insert(event.key);
                    let delta = event.time - last_time;
                    last_time = event.time;
                    if delta > 0 {
                        timeline.rows.push(make_row(delta, &on_notes, table));
                    }
                }
                // at four voices the note is dropped and the clock is
                // left untouched
            }
            EventKind::NoteOff => {
                timeline.note_off_count += 1;
                let delta = event.time - last_time;
                last_time = event.time;
                if delta > 0 {
                    // the row reflects the set as it sounded before this
                    // note's release
                    timeline.rows.push(make_row(delta, &on_notes, table));
                }
                // releasing a note dropped by the voice cap is a no-op
                on_notes.remove(&event.key);
            }
        }
    }

    timeline
}
