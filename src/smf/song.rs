//! Parsed song model
//!
//! Built append-only by the reader during the single parse pass and read
//! back by the timeline encoder and the presentation layer.

use super::event::MidiEvent;

/// Fields of the MThd chunk. Informational: the parser works purely in raw
/// ticks and never consumes the division numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfHeader {
    pub format: u16,
    pub num_tracks: u16,
    /// Raw division word with the SMPTE bit cleared.
    pub division: u16,
    /// Set when the division's top bit marked SMPTE-based timing.
    pub smpte: bool,
}

/// One MTrk chunk's worth of note events.
#[derive(Debug, Clone, Default)]
pub struct Track {
    /// Set by a Track Name meta event; a later occurrence overwrites.
    pub name: Option<String>,
    pub events: Vec<MidiEvent>,
}

/// A parsed Standard MIDI File.
///
/// A song with a non-empty `errors` list is still usable: parsing is
/// best-effort and commits everything gathered before each recoverable
/// anomaly.
#[derive(Debug, Clone)]
pub struct Song {
    /// Label for diagnostics, typically the input file name.
    pub source: String,
    pub header: Option<SmfHeader>,
    pub tracks: Vec<Track>,
    /// Number of MTrk chunks encountered.
    pub track_count: usize,
    /// Recoverable parse anomalies, in encounter order.
    pub errors: Vec<String>,
}

impl Song {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            header: None,
            tracks: Vec::new(),
            track_count: 0,
            errors: Vec::new(),
        }
    }

    /// Total note events across all tracks.
    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(|t| t.events.len()).sum()
    }
}
