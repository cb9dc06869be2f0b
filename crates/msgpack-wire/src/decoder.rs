//! `Decoder`: cursor-based MessagePack reader.
//!
//! A decoder walks a borrowed input buffer one value at a time. Every public
//! `decode_*` method is transactional: on error the cursor is left where the
//! call started, so the caller can [`Decoder::peek_tag`] and try another
//! shape.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::TimeDelta;
use msgpack_buffers::{BufferError, Reader};

use crate::code;
use crate::dynamic::MapDecoder;
use crate::error::{Error, Result};

/// Deepest nesting of arrays and maps that dynamic decoding and
/// [`Decoder::skip`] descend into.
pub const MAX_DEPTH: usize = 128;

/// MessagePack reader over a borrowed buffer.
///
/// Strings and binary blobs decode to [`Cow`]s. In zero-copy mode they borrow
/// from the input; otherwise they are copied out.
///
/// ```
/// use msgpack_wire::{Decoder, Encoder};
///
/// let enc = Encoder::new();
/// let mut buf = Vec::new();
/// enc.append_str(&mut buf, "hi");
/// enc.append_u16(&mut buf, 300);
///
/// let mut dec = Decoder::new(&buf);
/// dec.set_zero_copy(true);
/// assert_eq!(dec.decode_str().unwrap(), "hi");
/// assert_eq!(dec.decode_u16().unwrap(), 300);
/// assert_eq!(dec.remaining(), 0);
/// ```
#[derive(Clone, Default)]
pub struct Decoder<'a> {
    reader: Reader<'a>,
    loose: bool,
    zero_copy: bool,
    map_decoder: Option<Arc<dyn MapDecoder>>,
    depth: usize,
}

impl fmt::Debug for Decoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("position", &self.reader.position())
            .field("len", &self.reader.data().len())
            .field("loose", &self.loose)
            .field("zero_copy", &self.zero_copy)
            .field("map_decoder", &self.map_decoder.is_some())
            .finish()
    }
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
            ..Self::default()
        }
    }

    /// Starts decoding `data` from the beginning. Flags and the map strategy
    /// are kept.
    pub fn reset(&mut self, data: &'a [u8]) {
        self.reader.reset(data);
    }

    /// Decode dynamic values with [`Decoder::decode_value_loose`].
    pub fn set_loose(&mut self, on: bool) {
        self.loose = on;
    }

    /// Borrow strings and binary blobs from the input instead of copying them.
    pub fn set_zero_copy(&mut self, on: bool) {
        self.zero_copy = on;
    }

    /// Replaces the strategy used for every map reached by dynamic decoding.
    /// `None` restores the default string-keyed maps.
    pub fn set_map_decoder(&mut self, strategy: Option<Arc<dyn MapDecoder>>) {
        self.map_decoder = strategy;
    }

    pub fn is_loose(&self) -> bool {
        self.loose
    }

    pub fn is_zero_copy(&self) -> bool {
        self.zero_copy
    }

    pub fn map_decoder(&self) -> Option<&Arc<dyn MapDecoder>> {
        self.map_decoder.as_ref()
    }

    pub fn position(&self) -> usize {
        self.reader.position()
    }

    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }

    /// Steps back over the last byte read.
    pub fn unread_byte(&mut self) -> Result<()> {
        Ok(self.reader.unread()?)
    }

    /// Returns the next format code without consuming it.
    pub fn peek_tag(&self) -> Result<u8> {
        Ok(self.reader.peek()?)
    }

    /// Runs `f`, rewinding the cursor if it fails.
    pub(crate) fn atomic<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.reader;
        let out = f(self);
        if out.is_err() {
            self.reader = start;
        }
        out
    }

    /// Runs `f` one container level deeper, failing once [`MAX_DEPTH`]
    /// levels are open.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            tracing::debug!(position = self.position(), "nesting limit reached");
            return Err(Error::DepthLimit(MAX_DEPTH));
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    pub(crate) fn read_tag(&mut self) -> Result<u8> {
        Ok(self.reader.u8()?)
    }

    pub(crate) fn read_n(&mut self, n: usize) -> Result<&'a [u8]> {
        Ok(self.reader.buf(n)?)
    }

    pub(crate) fn skip_n(&mut self, n: usize) -> Result<()> {
        Ok(self.reader.skip(n)?)
    }

    // ------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------

    pub fn decode_nil(&mut self) -> Result<()> {
        self.atomic(|d| match d.read_tag()? {
            code::NIL => Ok(()),
            c => Err(Error::unexpected(c, "nil")),
        })
    }

    /// Decodes a boolean. Nil reads as `false`.
    pub fn decode_bool(&mut self) -> Result<bool> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.bool_with_tag(c)
        })
    }

    pub(crate) fn bool_with_tag(&mut self, c: u8) -> Result<bool> {
        match c {
            code::NIL | code::FALSE => Ok(false),
            code::TRUE => Ok(true),
            _ => Err(Error::unexpected(c, "bool")),
        }
    }

    pub fn decode_u8(&mut self) -> Result<u8> {
        self.fixed(code::UINT8, "uint8", Reader::u8)
    }

    pub fn decode_u16(&mut self) -> Result<u16> {
        self.fixed(code::UINT16, "uint16", Reader::u16)
    }

    pub fn decode_u32(&mut self) -> Result<u32> {
        self.fixed(code::UINT32, "uint32", Reader::u32)
    }

    pub fn decode_u64(&mut self) -> Result<u64> {
        self.fixed(code::UINT64, "uint64", Reader::u64)
    }

    pub fn decode_i8(&mut self) -> Result<i8> {
        self.fixed(code::INT8, "int8", Reader::i8)
    }

    pub fn decode_i16(&mut self) -> Result<i16> {
        self.fixed(code::INT16, "int16", Reader::i16)
    }

    pub fn decode_i32(&mut self) -> Result<i32> {
        self.fixed(code::INT32, "int32", Reader::i32)
    }

    pub fn decode_i64(&mut self) -> Result<i64> {
        self.fixed(code::INT64, "int64", Reader::i64)
    }

    pub fn decode_f32(&mut self) -> Result<f32> {
        self.fixed(code::FLOAT, "float32", Reader::f32)
    }

    /// Decodes a float32 or float64 as `f64`.
    pub fn decode_f64(&mut self) -> Result<f64> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.f64_with_tag(c)
        })
    }

    pub(crate) fn f64_with_tag(&mut self, c: u8) -> Result<f64> {
        match c {
            code::FLOAT => Ok(self.reader.f32()? as f64),
            code::DOUBLE => Ok(self.reader.f64()?),
            _ => Err(Error::unexpected(c, "float64")),
        }
    }

    /// Decodes any integer encoding as `i64`.
    pub fn decode_int(&mut self) -> Result<i64> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.int_with_tag(c)
        })
    }

    /// Decodes any non-negative integer encoding as `u64`.
    pub fn decode_uint(&mut self) -> Result<u64> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.uint_with_tag(c)
        })
    }

    pub(crate) fn int_with_tag(&mut self, c: u8) -> Result<i64> {
        let n = self.integer(c)?;
        i64::try_from(n).map_err(|_| Error::IntegerOverflow {
            value: n,
            target: "i64",
        })
    }

    pub(crate) fn uint_with_tag(&mut self, c: u8) -> Result<u64> {
        let n = self.integer(c)?;
        u64::try_from(n).map_err(|_| Error::IntegerOverflow {
            value: n,
            target: "u64",
        })
    }

    /// Reads the body of any integer code. `i128` holds both `u64::MAX` and
    /// `i64::MIN`.
    fn integer(&mut self, c: u8) -> Result<i128> {
        if code::is_fixed_num(c) {
            return Ok(c as i8 as i128);
        }
        let n = match c {
            code::UINT8 => self.reader.u8()? as i128,
            code::UINT16 => self.reader.u16()? as i128,
            code::UINT32 => self.reader.u32()? as i128,
            code::UINT64 => self.reader.u64()? as i128,
            code::INT8 => self.reader.i8()? as i128,
            code::INT16 => self.reader.i16()? as i128,
            code::INT32 => self.reader.i32()? as i128,
            code::INT64 => self.reader.i64()? as i128,
            _ => return Err(Error::unexpected(c, "integer")),
        };
        Ok(n)
    }

    /// Decodes a duration written as signed nanoseconds.
    pub fn decode_duration(&mut self) -> Result<TimeDelta> {
        self.decode_int().map(TimeDelta::nanoseconds)
    }

    fn fixed<T>(
        &mut self,
        want: u8,
        expected: &'static str,
        read: impl FnOnce(&mut Reader<'a>) -> std::result::Result<T, BufferError>,
    ) -> Result<T> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            if c != want {
                return Err(Error::unexpected(c, expected));
            }
            d.body(read)
        })
    }

    /// Reads a fixed-size body straight from the cursor.
    pub(crate) fn body<T>(
        &mut self,
        read: impl FnOnce(&mut Reader<'a>) -> std::result::Result<T, BufferError>,
    ) -> Result<T> {
        Ok(read(&mut self.reader)?)
    }

    // ------------------------------------------------------------------
    // Strings and binary
    // ------------------------------------------------------------------

    /// Length of a string or binary value, `None` for nil. Both families are
    /// accepted.
    pub fn decode_bytes_len(&mut self) -> Result<Option<usize>> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.bytes_len(c)
        })
    }

    pub(crate) fn bytes_len(&mut self, c: u8) -> Result<Option<usize>> {
        if c == code::NIL {
            return Ok(None);
        }
        if code::is_fixed_string(c) {
            return Ok(Some((c & code::FIXED_STR_MASK) as usize));
        }
        let n = match c {
            code::STR8 | code::BIN8 => self.reader.u8()? as usize,
            code::STR16 | code::BIN16 => self.reader.u16()? as usize,
            code::STR32 | code::BIN32 => self.reader.u32()? as usize,
            _ => return Err(Error::unexpected(c, "string/bytes length")),
        };
        Ok(Some(n))
    }

    /// Decodes a string. Nil and zero-length values give `""` without touching
    /// the buffer.
    pub fn decode_str(&mut self) -> Result<Cow<'a, str>> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.str_with_tag(c)
        })
    }

    pub(crate) fn str_with_tag(&mut self, c: u8) -> Result<Cow<'a, str>> {
        match self.bytes_len(c)? {
            None | Some(0) => Ok(Cow::Borrowed("")),
            Some(n) => {
                let raw = self.read_n(n)?;
                let s = std::str::from_utf8(raw).map_err(|_| Error::InvalidUtf8)?;
                Ok(if self.zero_copy {
                    Cow::Borrowed(s)
                } else {
                    Cow::Owned(s.to_owned())
                })
            }
        }
    }

    /// Decodes a binary blob; nil gives `None`.
    pub fn decode_bytes(&mut self) -> Result<Option<Cow<'a, [u8]>>> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.bytes_with_tag(c)
        })
    }

    pub(crate) fn bytes_with_tag(&mut self, c: u8) -> Result<Option<Cow<'a, [u8]>>> {
        match self.bytes_len(c)? {
            None => Ok(None),
            Some(n) => self.bytes_body(n).map(Some),
        }
    }

    pub(crate) fn bytes_body(&mut self, n: usize) -> Result<Cow<'a, [u8]>> {
        if n == 0 {
            return Ok(Cow::Borrowed(&[]));
        }
        let raw = self.read_n(n)?;
        Ok(if self.zero_copy {
            Cow::Borrowed(raw)
        } else {
            Cow::Owned(raw.to_vec())
        })
    }

    // ------------------------------------------------------------------
    // Collection headers
    // ------------------------------------------------------------------

    /// Array length, `None` for nil.
    pub fn decode_array_len(&mut self) -> Result<Option<usize>> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.array_len(c)
        })
    }

    pub(crate) fn array_len(&mut self, c: u8) -> Result<Option<usize>> {
        if c == code::NIL {
            return Ok(None);
        }
        if code::is_fixed_array(c) {
            return Ok(Some((c & code::FIXED_ARRAY_MASK) as usize));
        }
        match c {
            code::ARRAY16 => Ok(Some(self.reader.u16()? as usize)),
            code::ARRAY32 => Ok(Some(self.reader.u32()? as usize)),
            _ => Err(Error::unexpected(c, "array length")),
        }
    }

    /// Map length, `None` for nil. An extension header in front of the map
    /// is skipped.
    pub fn decode_map_len(&mut self) -> Result<Option<usize>> {
        self.atomic(|d| {
            let mut c = d.read_tag()?;
            if code::is_ext(c) {
                let header = ext_size_len(c) + 1;
                d.skip_n(header)?;
                tracing::trace!(code = c, header, "skipped ext header before map");
                c = d.read_tag()?;
            }
            d.map_len(c)
        })
    }

    pub(crate) fn map_len(&mut self, c: u8) -> Result<Option<usize>> {
        if c == code::NIL {
            return Ok(None);
        }
        if code::is_fixed_map(c) {
            return Ok(Some((c & code::FIXED_MAP_MASK) as usize));
        }
        match c {
            code::MAP16 => Ok(Some(self.reader.u16()? as usize)),
            code::MAP32 => Ok(Some(self.reader.u32()? as usize)),
            _ => Err(Error::unexpected(c, "map length")),
        }
    }

    // ------------------------------------------------------------------
    // Extensions
    // ------------------------------------------------------------------

    /// Decodes an extension header, returning the type id and body length.
    /// The body is left for the caller.
    pub fn decode_ext_header(&mut self) -> Result<(i8, usize)> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            d.ext_header(c)
        })
    }

    pub(crate) fn ext_header(&mut self, c: u8) -> Result<(i8, usize)> {
        let len = self.ext_len(c)?;
        let type_id = self.reader.i8()?;
        Ok((type_id, len))
    }

    pub(crate) fn ext_len(&mut self, c: u8) -> Result<usize> {
        match c {
            code::FIX_EXT1 => Ok(1),
            code::FIX_EXT2 => Ok(2),
            code::FIX_EXT4 => Ok(4),
            code::FIX_EXT8 => Ok(8),
            code::FIX_EXT16 => Ok(16),
            code::EXT8 => Ok(self.reader.u8()? as usize),
            code::EXT16 => Ok(self.reader.u16()? as usize),
            code::EXT32 => Ok(self.reader.u32()? as usize),
            _ => Err(Error::unexpected(c, "ext len")),
        }
    }
}

/// Bytes between an ext code and its type byte.
fn ext_size_len(c: u8) -> usize {
    match c {
        code::EXT8 => 1,
        code::EXT16 => 2,
        code::EXT32 => 4,
        _ => 0,
    }
}
