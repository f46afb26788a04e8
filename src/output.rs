//! Presentation layer for parsed songs and encoded timelines
//!
//! The core returns data structures; everything printable lives here.

use crate::freq::NoteTable;
use crate::smf::Song;
use crate::timeline::{Row, Timeline};
use serde::Serialize;
use std::io::{self, Write};

/// Write the row sequence in the form the sound-driver program consumes:
/// one initializer line per row, a closing brace, and the trailing song
/// length.
pub fn write_rows<W: Write>(w: &mut W, timeline: &Timeline) -> io::Result<()> {
    for row in &timeline.rows {
        writeln!(
            w,
            "  {{ {}, {}, {}, {}, {}}},",
            row.delta, row.voices[0], row.voices[1], row.voices[2], row.voices[3]
        )?;
    }
    writeln!(w, "}};")?;
    writeln!(w, "int songlen = {};", timeline.song_length())?;
    Ok(())
}

/// Write the full note catalog as number/counter/name lines.
pub fn write_note_table<W: Write>(w: &mut W, table: &NoteTable) -> io::Result<()> {
    for note in table.notes() {
        writeln!(w, "{}\t{}\t{}", note.number, note.counter, note.name)?;
    }
    Ok(())
}

/// Top-level JSON structure for a converted song
#[derive(Debug, Clone, Serialize)]
pub struct SongJson {
    /// Source label, typically the input file name
    pub source: String,
    /// SMF format word, absent when the file had no header chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<u16>,
    /// Ticks per quarter note, absent for SMPTE-timed files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<u16>,
    /// Per-track summaries
    pub tracks: Vec<TrackJson>,
    /// Recoverable parse anomalies
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Encoded output rows
    pub rows: Vec<Row>,
    /// Trailing song-length value (number of rows)
    pub song_length: usize,
}

/// JSON representation of one parsed track
#[derive(Debug, Clone, Serialize)]
pub struct TrackJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub event_count: usize,
}

impl SongJson {
    pub fn new(song: &Song, timeline: &Timeline) -> Self {
        let (format, division) = match song.header {
            Some(h) => (Some(h.format), (!h.smpte).then_some(h.division)),
            None => (None, None),
        };
        Self {
            source: song.source.clone(),
            format,
            division,
            tracks: song
                .tracks
                .iter()
                .map(|t| TrackJson {
                    name: t.name.clone(),
                    event_count: t.events.len(),
                })
                .collect(),
            errors: song.errors.clone(),
            rows: timeline.rows.clone(),
            song_length: timeline.song_length(),
        }
    }
}
