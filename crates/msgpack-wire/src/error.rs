//! MessagePack codec error type.

use msgpack_buffers::BufferError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("short buffer: need {needed} bytes, {remaining} remaining")]
    ShortBuffer { needed: usize, remaining: usize },
    #[error("unread byte at beginning of buffer")]
    UnreadAtStart,
    #[error("unexpected code={tag:#04x} decoding {expected}")]
    UnexpectedTag { tag: u8, expected: &'static str },
    #[error("integer {value} out of range for {target}")]
    IntegerOverflow { value: i128, target: &'static str },
    #[error("nesting deeper than {0} levels")]
    DepthLimit(usize),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("invalid time ext id={0}")]
    InvalidExtId(i8),
    #[error("invalid ext len={0} decoding time")]
    InvalidExtLen(usize),
    #[error("invalid RFC 3339 timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),
    #[error("timestamp out of range: {secs}s {nanos}ns")]
    TimestampOutOfRange { secs: i64, nanos: u32 },
}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfInput => Error::EndOfInput,
            BufferError::ShortBuffer { needed, remaining } => {
                Error::ShortBuffer { needed, remaining }
            }
            BufferError::UnreadAtStart => Error::UnreadAtStart,
        }
    }
}

impl Error {
    pub(crate) fn unexpected(tag: u8, expected: &'static str) -> Self {
        Error::UnexpectedTag { tag, expected }
    }

    /// True for the errors caused by input ending early.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::EndOfInput | Error::ShortBuffer { .. })
    }
}
