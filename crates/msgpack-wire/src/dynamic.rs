//! Decoding into [`Value`] when the shape of the input is not known.
//!
//! Two flavours exist. Strict decoding keeps the exact kind the wire used
//! (`int16` stays [`Value::I16`]). Loose decoding folds numbers into
//! `I64`/`U64`/`F64` and binary blobs holding UTF-8 into strings.
//!
//! Arrays and maps nest at most [`MAX_DEPTH`](crate::MAX_DEPTH) levels deep.
//!
//! Maps go through a [`MapDecoder`] strategy. Without one, keys must be
//! strings and the result is a [`Value::Map`].

use std::borrow::Cow;

use indexmap::IndexMap;
use msgpack_buffers::Reader;

use crate::code;
use crate::error::{Error, Result};
use crate::timestamp::{ALT_EXT_ID, EXT_ID};
use crate::value::{StrMap, Value, ValueMap};
use crate::Decoder;

/// Upper bound on capacity reserved up front from a length read off the
/// wire. Longer collections still decode, growing as they go.
pub const ALLOC_LIMIT: usize = 10_000;

/// Builds the value for a map reached by dynamic decoding.
///
/// The decoder is positioned on the map's format code; the strategy must
/// consume the whole map. Closures with the matching signature implement
/// this trait.
pub trait MapDecoder: Send + Sync {
    fn decode_map<'a>(&self, dec: &mut Decoder<'a>) -> Result<Value<'a>>;
}

impl<F> MapDecoder for F
where
    F: for<'a> Fn(&mut Decoder<'a>) -> Result<Value<'a>> + Send + Sync,
{
    fn decode_map<'a>(&self, dec: &mut Decoder<'a>) -> Result<Value<'a>> {
        self(dec)
    }
}

/// Strategy that accepts keys of any kind and yields [`Value::AnyMap`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UntypedMaps;

impl MapDecoder for UntypedMaps {
    fn decode_map<'a>(&self, dec: &mut Decoder<'a>) -> Result<Value<'a>> {
        Ok(dec.decode_untyped_map()?.map_or(Value::Nil, Value::AnyMap))
    }
}

/// Binary read in loose mode: a string when the bytes are UTF-8, otherwise
/// left as binary.
fn bin_as_str(bytes: Cow<'_, [u8]>) -> Value<'_> {
    match bytes {
        Cow::Borrowed(raw) => match std::str::from_utf8(raw) {
            Ok(s) => Value::Str(Cow::Borrowed(s)),
            Err(_) => Value::Bin(Cow::Borrowed(raw)),
        },
        Cow::Owned(raw) => match String::from_utf8(raw) {
            Ok(s) => Value::Str(Cow::Owned(s)),
            Err(err) => Value::Bin(Cow::Owned(err.into_bytes())),
        },
    }
}

/// Capacity to reserve for a collection of `len` elements.
pub(crate) fn capacity(len: usize) -> usize {
    if len > ALLOC_LIMIT {
        tracing::debug!(len, limit = ALLOC_LIMIT, "capping preallocation");
        ALLOC_LIMIT
    } else {
        len
    }
}

impl<'a> Decoder<'a> {
    /// Decodes the next value, strictly or loosely depending on
    /// [`Decoder::set_loose`].
    pub fn decode_dynamic(&mut self) -> Result<Value<'a>> {
        self.atomic(|d| d.dynamic())
    }

    /// Decodes the next value keeping the wire's exact kinds. Nested values
    /// are decoded strictly as well.
    pub fn decode_value(&mut self) -> Result<Value<'a>> {
        self.with_loose(false)
    }

    /// Decodes the next value with numbers widened and UTF-8 binary read as
    /// strings. Binary that is not UTF-8 stays [`Value::Bin`]. Nested values
    /// are decoded loosely as well.
    pub fn decode_value_loose(&mut self) -> Result<Value<'a>> {
        self.with_loose(true)
    }

    fn with_loose(&mut self, loose: bool) -> Result<Value<'a>> {
        let saved = self.is_loose();
        self.set_loose(loose);
        let out = self.decode_dynamic();
        self.set_loose(saved);
        out
    }

    fn dynamic(&mut self) -> Result<Value<'a>> {
        let c = self.read_tag()?;
        if code::is_map(c) || code::is_array(c) {
            return self.nested(|d| d.value_with_tag(c));
        }
        self.value_with_tag(c)
    }

    fn value_with_tag(&mut self, c: u8) -> Result<Value<'a>> {
        if self.is_loose() {
            self.loose_with_tag(c)
        } else {
            self.strict_with_tag(c)
        }
    }

    fn strict_with_tag(&mut self, c: u8) -> Result<Value<'a>> {
        if code::is_fixed_num(c) {
            return Ok(Value::I8(c as i8));
        }
        if let Some(value) = self.shared_with_tag(c)? {
            return Ok(value);
        }
        Ok(match c {
            code::FLOAT => Value::F32(self.body(Reader::f32)?),
            code::DOUBLE => Value::F64(self.body(Reader::f64)?),
            code::UINT8 => Value::U8(self.body(Reader::u8)?),
            code::UINT16 => Value::U16(self.body(Reader::u16)?),
            code::UINT32 => Value::U32(self.body(Reader::u32)?),
            code::UINT64 => Value::U64(self.body(Reader::u64)?),
            code::INT8 => Value::I8(self.body(Reader::i8)?),
            code::INT16 => Value::I16(self.body(Reader::i16)?),
            code::INT32 => Value::I32(self.body(Reader::i32)?),
            code::INT64 => Value::I64(self.body(Reader::i64)?),
            code::BIN8 | code::BIN16 | code::BIN32 => {
                self.bytes_with_tag(c)?.map_or(Value::Nil, Value::Bin)
            }
            _ => return Err(Error::unexpected(c, "value")),
        })
    }

    fn loose_with_tag(&mut self, c: u8) -> Result<Value<'a>> {
        if code::is_fixed_num(c) {
            return Ok(Value::I64(c as i8 as i64));
        }
        if let Some(value) = self.shared_with_tag(c)? {
            return Ok(value);
        }
        Ok(match c {
            code::FLOAT | code::DOUBLE => Value::F64(self.f64_with_tag(c)?),
            code::UINT8 | code::UINT16 | code::UINT32 | code::UINT64 => {
                Value::U64(self.uint_with_tag(c)?)
            }
            code::INT8 | code::INT16 | code::INT32 | code::INT64 => {
                Value::I64(self.int_with_tag(c)?)
            }
            code::BIN8 | code::BIN16 | code::BIN32 => {
                self.bytes_with_tag(c)?.map_or(Value::Nil, bin_as_str)
            }
            _ => return Err(Error::unexpected(c, "value")),
        })
    }

    /// Kinds decoded the same way in both modes.
    fn shared_with_tag(&mut self, c: u8) -> Result<Option<Value<'a>>> {
        if code::is_map(c) {
            self.unread_byte()?;
            return self.map_default().map(Some);
        }
        if code::is_array(c) {
            let n = self.array_len(c)?.unwrap_or(0);
            return self.array_body(n).map(|items| Some(Value::Array(items)));
        }
        if code::is_string(c) {
            return self.str_with_tag(c).map(|s| Some(Value::Str(s)));
        }
        if code::is_ext(c) {
            return self.ext_value(c).map(Some);
        }
        match c {
            code::NIL => Ok(Some(Value::Nil)),
            code::FALSE | code::TRUE => self.bool_with_tag(c).map(|b| Some(Value::Bool(b))),
            _ => Ok(None),
        }
    }

    fn ext_value(&mut self, c: u8) -> Result<Value<'a>> {
        let (type_id, len) = self.ext_header(c)?;
        if type_id == EXT_ID || type_id == ALT_EXT_ID {
            return self.time_body(len).map(Value::Timestamp);
        }
        let data = self.bytes_body(len)?;
        Ok(Value::Ext { type_id, data })
    }

    fn map_default(&mut self) -> Result<Value<'a>> {
        if let Some(strategy) = self.map_decoder().cloned() {
            return strategy.decode_map(self);
        }
        Ok(self.decode_map()?.map_or(Value::Nil, Value::Map))
    }

    fn array_body(&mut self, n: usize) -> Result<Vec<Value<'a>>> {
        let mut items = Vec::with_capacity(capacity(n));
        for _ in 0..n {
            items.push(self.dynamic()?);
        }
        Ok(items)
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    /// Decodes an array of dynamic values; nil gives `None`.
    pub fn decode_array(&mut self) -> Result<Option<Vec<Value<'a>>>> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            match d.array_len(c)? {
                None => Ok(None),
                Some(n) => d.array_body(n).map(Some),
            }
        })
    }

    /// Decodes a string-keyed map of dynamic values; nil gives `None`.
    /// A repeated key keeps its first position and its last value.
    pub fn decode_map(&mut self) -> Result<Option<StrMap<'a>>> {
        self.atomic(|d| {
            let Some(n) = d.decode_map_len()? else {
                return Ok(None);
            };
            let mut map = IndexMap::with_capacity(capacity(n));
            for _ in 0..n {
                let key = d.map_key()?;
                let value = d.dynamic()?;
                map.insert(key, value);
            }
            Ok(Some(map))
        })
    }

    /// Decodes a map with keys of any kind; nil gives `None`.
    pub fn decode_untyped_map(&mut self) -> Result<Option<ValueMap<'a>>> {
        self.atomic(|d| {
            let Some(n) = d.decode_map_len()? else {
                return Ok(None);
            };
            let mut map = IndexMap::with_capacity(capacity(n));
            for _ in 0..n {
                let key = d.dynamic()?;
                let value = d.dynamic()?;
                map.insert(key, value);
            }
            Ok(Some(map))
        })
    }

    /// Decodes an array of strings; nil gives `None`.
    pub fn decode_str_array(&mut self) -> Result<Option<Vec<Cow<'a, str>>>> {
        self.atomic(|d| {
            let Some(n) = d.decode_array_len()? else {
                return Ok(None);
            };
            let mut items = Vec::with_capacity(capacity(n));
            for _ in 0..n {
                items.push(d.decode_str()?);
            }
            Ok(Some(items))
        })
    }

    /// Decodes a string to string map; nil gives `None`.
    pub fn decode_str_map(&mut self) -> Result<Option<IndexMap<Cow<'a, str>, Cow<'a, str>>>> {
        self.atomic(|d| {
            let Some(n) = d.decode_map_len()? else {
                return Ok(None);
            };
            let mut map = IndexMap::with_capacity(capacity(n));
            for _ in 0..n {
                let key = d.map_key()?;
                let value = d.decode_str()?;
                map.insert(key, value);
            }
            Ok(Some(map))
        })
    }

    fn map_key(&mut self) -> Result<Cow<'a, str>> {
        let c = self.read_tag()?;
        if !code::is_string(c) && !code::is_bin(c) {
            return Err(Error::unexpected(c, "string"));
        }
        self.str_with_tag(c)
    }
}
