pub mod error;
pub mod freq;
pub mod output;
pub mod smf;
pub mod timeline;

pub use error::Error;
pub use freq::NoteTable;
pub use smf::Song;
pub use timeline::Timeline;
