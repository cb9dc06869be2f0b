//! Binary buffer reader with cursor tracking.

use crate::BufferError;

/// A cursor over an immutable byte slice.
///
/// The cursor only moves forward, except for [`Reader::unread`] which steps
/// back exactly one byte. Reads never consume a partial value.
///
/// # Example
///
/// ```
/// use msgpack_buffers::Reader;
///
/// let data = [0xcd, 0x01, 0x00];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), Ok(0xcd));
/// assert_eq!(reader.u16(), Ok(256));
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Default for Reader<'_> {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Points the reader at a new buffer and rewinds to its start.
    pub fn reset(&mut self, data: &'a [u8]) {
        self.data = data;
        self.pos = 0;
    }

    /// The whole underlying buffer, including already consumed bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        let remaining = self.remaining();
        if n > remaining {
            Err(BufferError::ShortBuffer {
                needed: n,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Looks at the next byte without consuming it.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(BufferError::EndOfInput)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        let val = self.peek()?;
        self.pos += 1;
        Ok(val)
    }

    /// Steps the cursor back by one byte.
    pub fn unread(&mut self) -> Result<(), BufferError> {
        if self.pos == 0 {
            return Err(BufferError::UnreadAtStart);
        }
        self.pos -= 1;
        Ok(())
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        self.u8().map(|b| b as i8)
    }

    /// Reads an unsigned 16-bit big-endian integer.
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.array().map(u16::from_be_bytes)
    }

    /// Reads a signed 16-bit big-endian integer.
    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        self.array().map(i16::from_be_bytes)
    }

    /// Reads an unsigned 32-bit big-endian integer.
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_be_bytes)
    }

    /// Reads a signed 32-bit big-endian integer.
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.array().map(i32::from_be_bytes)
    }

    /// Reads an unsigned 64-bit big-endian integer.
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.array().map(u64::from_be_bytes)
    }

    /// Reads a signed 64-bit big-endian integer.
    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        self.array().map(i64::from_be_bytes)
    }

    /// Reads a 32-bit big-endian float.
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.array().map(f32::from_be_bytes)
    }

    /// Reads a 64-bit big-endian float.
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.array().map(f64::from_be_bytes)
    }

    /// Returns the next `size` bytes as a subslice of the input and advances
    /// past them.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.pos;
        self.pos += size;
        Ok(&self.data[start..self.pos])
    }

    /// Advances the cursor by `size` bytes.
    pub fn skip(&mut self, size: usize) -> Result<(), BufferError> {
        self.check(size)?;
        self.pos += size;
        Ok(())
    }
}
