use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("read of {needed} byte(s) at offset {offset} past end of buffer (length {len})")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
