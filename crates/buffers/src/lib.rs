//! Binary buffer cursor used by the MessagePack decoder.
//!
//! [`Reader`] reads big-endian integers, floats and raw byte runs from a
//! borrowed slice. Every read is transactional: when the buffer does not hold
//! enough bytes the read fails and the cursor stays where it was.
//!
//! # Example
//!
//! ```
//! use msgpack_buffers::{BufferError, Reader};
//!
//! let data = [0x01, 0x02, 0x03];
//! let mut reader = Reader::new(&data);
//!
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.u32(), Err(BufferError::ShortBuffer { needed: 4, remaining: 2 }));
//! assert_eq!(reader.u16(), Ok(0x0203));
//! ```

mod reader;

pub use reader::Reader;

use thiserror::Error;

/// Error type for cursor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A single-byte read was attempted at the end of the buffer.
    #[error("unexpected end of input")]
    EndOfInput,
    /// A fixed-size read needs more bytes than remain. Nothing was consumed.
    #[error("short buffer: need {needed} bytes, {remaining} remaining")]
    ShortBuffer { needed: usize, remaining: usize },
    /// A one-byte rewind was attempted at position 0.
    #[error("unread byte at beginning of buffer")]
    UnreadAtStart,
}
