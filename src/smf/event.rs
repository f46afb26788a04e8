//! MIDI event model and status byte constants

/// System and meta status bytes.
pub mod status {
    /// System Exclusive start; body runs until `SYSEX_END`.
    pub const SYSEX: u8 = 0xF0;
    /// Song Position Pointer (2 data bytes).
    pub const SONG_POSITION: u8 = 0xF2;
    /// Song Select (1 data byte).
    pub const SONG_SELECT: u8 = 0xF3;
    /// Tune Request.
    pub const TUNE_REQUEST: u8 = 0xF6;
    /// End of Exclusive.
    pub const SYSEX_END: u8 = 0xF7;
    /// Timing Clock.
    pub const TIMING_CLOCK: u8 = 0xF8;
    /// Start.
    pub const START: u8 = 0xFA;
    /// Continue.
    pub const CONTINUE: u8 = 0xFB;
    /// Stop.
    pub const STOP: u8 = 0xFC;
    /// Active Sensing.
    pub const ACTIVE_SENSING: u8 = 0xFE;
    /// Meta event introducer.
    pub const META: u8 = 0xFF;
}

/// Channel voice message types (high nibble of the status byte).
pub mod voice {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLY_PRESSURE: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    pub const PITCH_WHEEL: u8 = 0xE0;
}

/// Meta event types.
pub mod meta {
    pub const TRACK_NAME: u8 = 0x03;
    pub const MARKER: u8 = 0x06;
    pub const CHANNEL_PREFIX: u8 = 0x20;
    pub const PORT_PREFIX: u8 = 0x21;
    pub const END_OF_TRACK: u8 = 0x2F;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn,
    NoteOff,
}

/// A note event with its absolute position in the song.
///
/// Merged-timeline ordering is by `(time, track)`; the track index breaks
/// ties between simultaneous events so output is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    /// Absolute time in ticks, accumulated from delta times.
    pub time: u32,
    pub kind: EventKind,
    /// Channel 0-15, from the status byte's low nibble.
    pub channel: u8,
    /// Index of the track chunk this event came from.
    pub track: usize,
    /// MIDI note number 0-127.
    pub key: u8,
    /// Velocity 0-127. A velocity-0 NoteOn is kept as a NoteOn.
    pub velocity: u8,
}

impl MidiEvent {
    /// Merge ordering key: time ascending, track index as tie-break.
    pub fn order_key(&self) -> (u32, usize) {
        (self.time, self.track)
    }
}
