//! SMF chunk reader and event-stream parser
//!
//! Walks the byte buffer chunk by chunk. Only `MThd` and `MTrk` are
//! interpreted; any other chunk is skipped via its declared length. Within
//! a track chunk the MIDI channel-voice/meta/system state machine runs with
//! running status and collects note events into the song model.
//!
//! Reads past the end of the buffer are fatal for the whole parse. All
//! other anomalies are recorded in `Song::errors` and parsing continues.

use super::event::{meta, status, voice, EventKind, MidiEvent};
use super::song::{SmfHeader, Song, Track};
use crate::error::{Error, Result};

/// Cursor over a complete SMF byte buffer.
pub struct SmfReader<'a> {
    data: &'a [u8],
    pos: usize,
}

/// Parse a complete SMF buffer into a song.
pub fn parse(source: impl Into<String>, data: &[u8]) -> Result<Song> {
    SmfReader::new(data).read_song(source)
}

impl<'a> SmfReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Check if the cursor has reached the end of the buffer.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn out_of_bounds(&self, needed: usize) -> Error {
        Error::OutOfBounds {
            offset: self.pos,
            needed,
            len: self.data.len(),
        }
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(self.out_of_bounds(1));
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    /// Read the next byte without advancing.
    pub fn peek_u8(&self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(self.out_of_bounds(1));
        }
        Ok(self.data[self.pos])
    }

    /// Read a 16-bit big-endian value.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let hi = self.read_u8()? as u16;
        let lo = self.read_u8()? as u16;
        Ok((hi << 8) | lo)
    }

    /// Read a 32-bit big-endian value.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let hi = self.read_u16_be()? as u32;
        let lo = self.read_u16_be()? as u32;
        Ok((hi << 16) | lo)
    }

    /// Read a slice of `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.pos + len > self.data.len() {
            return Err(self.out_of_bounds(len));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Look at `len` bytes without advancing.
    fn peek_bytes(&self, len: usize) -> Result<&'a [u8]> {
        if self.pos + len > self.data.len() {
            return Err(self.out_of_bounds(len));
        }
        Ok(&self.data[self.pos..self.pos + len])
    }

    /// Advance the cursor by `len` bytes.
    fn skip(&mut self, len: usize) -> Result<()> {
        if self.pos + len > self.data.len() {
            return Err(self.out_of_bounds(len));
        }
        self.pos += len;
        Ok(())
    }

    /// Read a MIDI variable-length quantity.
    ///
    /// Low 7 bits of each byte are ORed into the accumulator, which shifts
    /// left 7 bits before each continuation byte; the first byte with the
    /// high bit clear terminates the value.
    pub fn read_vlq(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        loop {
            let b = self.read_u8()?;
            value |= (b & 0x7F) as u32;
            if b & 0x80 != 0 {
                value <<= 7;
            } else {
                break;
            }
        }
        Ok(value)
    }

    /// Consume the whole buffer, one chunk at a time.
    pub fn read_song(mut self, source: impl Into<String>) -> Result<Song> {
        let mut song = Song::new(source);
        while !self.is_eof() {
            self.read_chunk(&mut song)?;
        }
        Ok(song)
    }

    /// Read one chunk starting at the current position.
    ///
    /// The next chunk begins at `start + 8 + length` no matter how much of
    /// the body the sub-parser consumed; the declared length is the
    /// authoritative resync point.
    fn read_chunk(&mut self, song: &mut Song) -> Result<()> {
        let start = self.pos;
        let tag = self.read_bytes(4)?;
        let len = self.read_u32_be()? as usize;

        match tag {
            b"MThd" => self.read_header_chunk(song)?,
            b"MTrk" => {
                let track_end = self.pos + len;
                self.read_track_chunk(song, track_end)?;
            }
            _ => {
                song.errors.push(format!(
                    "no handler for chunk '{}' at offset {} - skipping",
                    String::from_utf8_lossy(tag),
                    start
                ));
            }
        }

        self.pos = start + 8 + len;
        Ok(())
    }

    /// Read the MThd body. The fields are informational only; decoding
    /// works in raw ticks either way.
    fn read_header_chunk(&mut self, song: &mut Song) -> Result<()> {
        let format = self.read_u16_be()?;
        let num_tracks = self.read_u16_be()?;
        let division = self.read_u16_be()?;
        let smpte = division & 0x8000 != 0;
        song.header = Some(SmfHeader {
            format,
            num_tracks,
            division: division & 0x7FFF,
            smpte,
        });
        Ok(())
    }

    /// Run the event state machine over one MTrk body.
    fn read_track_chunk(&mut self, song: &mut Song, track_end: usize) -> Result<()> {
        let track_index = song.track_count;
        song.track_count += 1;

        let mut track = Track::default();
        let mut absolute_time: u32 = 0;
        let mut running_status: u8 = 0;

        while self.pos < track_end {
            let delta = self.read_vlq()?;
            absolute_time = absolute_time.saturating_add(delta);

            let event_offset = self.pos;
            let next = self.peek_u8()?;
            let event_status = if next & 0x80 != 0 {
                // a real status byte - consume it
                self.pos += 1;
                running_status = next;
                next
            } else {
                // status omitted, substitute the previous one
                running_status
            };

            match event_status {
                status::SYSEX => {
                    // scan forward to the terminating EOX byte, inclusive
                    while self.read_u8()? != status::SYSEX_END {}
                }
                0xF1 | 0xF4 | 0xF5 | 0xF9 | 0xFD => {
                    // undefined/reserved, no data bytes
                }
                status::SONG_POSITION => self.skip(2)?,
                status::SONG_SELECT => self.skip(1)?,
                status::TUNE_REQUEST
                | status::SYSEX_END
                | status::TIMING_CLOCK
                | status::START
                | status::CONTINUE
                | status::STOP
                | status::ACTIVE_SENSING => {
                    // single-byte realtime/system messages
                }
                status::META => {
                    let meta_type = self.read_u8()?;
                    let len = self.read_vlq()? as usize;
                    match meta_type {
                        meta::TRACK_NAME => {
                            let bytes = self.peek_bytes(len)?;
                            track.name = Some(String::from_utf8_lossy(bytes).into_owned());
                        }
                        meta::MARKER => {
                            // diagnostic only, discarded
                        }
                        meta::CHANNEL_PREFIX | meta::PORT_PREFIX | meta::END_OF_TRACK => {}
                        _ => {
                            // unrecognized meta type, non-fatal
                        }
                    }
                    // the declared length is authoritative for every branch
                    self.skip(len)?;
                }
                s if s & 0x80 != 0 => {
                    let channel = s & 0x0F;
                    match s & 0xF0 {
                        voice::NOTE_OFF => {
                            let key = self.read_u8()?;
                            let velocity = self.read_u8()?;
                            track.events.push(MidiEvent {
                                time: absolute_time,
                                kind: EventKind::NoteOff,
                                channel,
                                track: track_index,
                                key,
                                velocity,
                            });
                        }
                        voice::NOTE_ON => {
                            // velocity 0 is recorded as a NoteOn as-is; the
                            // encoder decides what to make of it
                            let key = self.read_u8()?;
                            let velocity = self.read_u8()?;
                            track.events.push(MidiEvent {
                                time: absolute_time,
                                kind: EventKind::NoteOn,
                                channel,
                                track: track_index,
                                key,
                                velocity,
                            });
                        }
                        voice::POLY_PRESSURE | voice::CONTROL_CHANGE | voice::PITCH_WHEEL => {
                            self.skip(2)?;
                        }
                        voice::PROGRAM_CHANGE | voice::CHANNEL_PRESSURE => {
                            self.skip(1)?;
                        }
                        _ => unreachable!("high bit set and high nibble not 0x8-0xF"),
                    }
                }
                other => {
                    // typically a data byte with no running status to reuse
                    song.errors.push(format!(
                        "unknown event type {:#04x} at offset {} - halting track",
                        other, event_offset
                    ));
                    break;
                }
            }
        }

        // commit whatever was gathered, even after a halt
        song.tracks.push(track);
        Ok(())
    }
}
