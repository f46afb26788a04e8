pub mod event;
pub mod reader;
pub mod song;

pub use event::{EventKind, MidiEvent};
pub use reader::{parse, SmfReader};
pub use song::{SmfHeader, Song, Track};
