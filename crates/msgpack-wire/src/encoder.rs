//! `Encoder`: append-style MessagePack writer.
//!
//! The encoder holds configuration only. Every `append_*` method writes one
//! value to the end of a caller-owned `Vec<u8>`, so a single encoder can be
//! shared freely between threads and buffers.

use crate::code;
use crate::encode::Encode;

/// MessagePack writer configuration.
///
/// The default encoder preserves integer widths, writes floats as floats and
/// emits map entries in iteration order.
///
/// ```
/// use msgpack_wire::Encoder;
///
/// let enc = Encoder::new().compact_ints(true);
/// let mut buf = Vec::new();
/// enc.append_u64(&mut buf, 1);
/// enc.append(&mut buf, &1u64);
/// assert_eq!(buf, [0xcf, 0, 0, 0, 0, 0, 0, 0, 1, 0x01]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoder {
    sort_map_keys: bool,
    compact_ints: bool,
    compact_floats: bool,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit string map keys in increasing byte order.
    pub fn sort_map_keys(mut self, on: bool) -> Self {
        self.sort_map_keys = on;
        self
    }

    /// Encode integers in the fewest bytes that hold their value, dropping
    /// the source width.
    pub fn compact_ints(mut self, on: bool) -> Self {
        self.compact_ints = on;
        self
    }

    /// Encode floats that hold an exact integer value as integers.
    pub fn compact_floats(mut self, on: bool) -> Self {
        self.compact_floats = on;
        self
    }

    pub fn sorts_map_keys(&self) -> bool {
        self.sort_map_keys
    }

    pub fn uses_compact_ints(&self) -> bool {
        self.compact_ints
    }

    pub fn uses_compact_floats(&self) -> bool {
        self.compact_floats
    }

    /// Appends any supported value.
    pub fn append<T: Encode + ?Sized>(&self, dst: &mut Vec<u8>, value: &T) {
        value.encode(self, dst);
    }

    /// Appends each value in order.
    pub fn append_multi(&self, dst: &mut Vec<u8>, values: &[&dyn Encode]) {
        for value in values {
            value.encode(self, dst);
        }
    }

    /// Encodes a single value into a fresh buffer.
    pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> Vec<u8> {
        let mut dst = Vec::new();
        value.encode(self, &mut dst);
        dst
    }

    pub fn append_nil(&self, dst: &mut Vec<u8>) {
        dst.push(code::NIL);
    }

    pub fn append_bool(&self, dst: &mut Vec<u8>, value: bool) {
        dst.push(if value { code::TRUE } else { code::FALSE });
    }

    // ------------------------------------------------------------------
    // Integers
    // ------------------------------------------------------------------

    /// Appends an `u8` in 2 bytes, preserving the type of the number.
    pub fn append_u8(&self, dst: &mut Vec<u8>, n: u8) {
        dst.extend_from_slice(&[code::UINT8, n]);
    }

    /// Appends an `u16` in 3 bytes, preserving the type of the number.
    pub fn append_u16(&self, dst: &mut Vec<u8>, n: u16) {
        dst.push(code::UINT16);
        dst.extend_from_slice(&n.to_be_bytes());
    }

    /// Appends an `u32` in 5 bytes, preserving the type of the number.
    pub fn append_u32(&self, dst: &mut Vec<u8>, n: u32) {
        dst.push(code::UINT32);
        dst.extend_from_slice(&n.to_be_bytes());
    }

    /// Appends an `u64` in 9 bytes, preserving the type of the number.
    pub fn append_u64(&self, dst: &mut Vec<u8>, n: u64) {
        dst.push(code::UINT64);
        dst.extend_from_slice(&n.to_be_bytes());
    }

    pub fn append_i8(&self, dst: &mut Vec<u8>, n: i8) {
        dst.extend_from_slice(&[code::INT8, n as u8]);
    }

    pub fn append_i16(&self, dst: &mut Vec<u8>, n: i16) {
        dst.push(code::INT16);
        dst.extend_from_slice(&n.to_be_bytes());
    }

    pub fn append_i32(&self, dst: &mut Vec<u8>, n: i32) {
        dst.push(code::INT32);
        dst.extend_from_slice(&n.to_be_bytes());
    }

    pub fn append_i64(&self, dst: &mut Vec<u8>, n: i64) {
        dst.push(code::INT64);
        dst.extend_from_slice(&n.to_be_bytes());
    }

    /// Appends an unsigned number in 1, 2, 3, 5 or 9 bytes. The type of the
    /// number is lost.
    pub fn append_uint(&self, dst: &mut Vec<u8>, n: u64) {
        if n <= code::POS_FIXED_NUM_HIGH as u64 {
            dst.push(n as u8);
        } else if n <= u8::MAX as u64 {
            self.append_u8(dst, n as u8);
        } else if n <= u16::MAX as u64 {
            self.append_u16(dst, n as u16);
        } else if n <= u32::MAX as u64 {
            self.append_u32(dst, n as u32);
        } else {
            self.append_u64(dst, n);
        }
    }

    /// Appends a signed number in 1, 2, 3, 5 or 9 bytes. The type of the
    /// number is lost.
    pub fn append_int(&self, dst: &mut Vec<u8>, n: i64) {
        if n >= 0 {
            self.append_uint(dst, n as u64);
        } else if n >= code::NEG_FIXED_NUM_LOW as i8 as i64 {
            dst.push(n as u8);
        } else if n >= i8::MIN as i64 {
            self.append_i8(dst, n as i8);
        } else if n >= i16::MIN as i64 {
            self.append_i16(dst, n as i16);
        } else if n >= i32::MIN as i64 {
            self.append_i32(dst, n as i32);
        } else {
            self.append_i64(dst, n);
        }
    }

    pub(crate) fn append_u8_cond(&self, dst: &mut Vec<u8>, n: u8) {
        if self.compact_ints {
            self.append_uint(dst, n as u64);
        } else {
            self.append_u8(dst, n);
        }
    }

    pub(crate) fn append_u16_cond(&self, dst: &mut Vec<u8>, n: u16) {
        if self.compact_ints {
            self.append_uint(dst, n as u64);
        } else {
            self.append_u16(dst, n);
        }
    }

    pub(crate) fn append_u32_cond(&self, dst: &mut Vec<u8>, n: u32) {
        if self.compact_ints {
            self.append_uint(dst, n as u64);
        } else {
            self.append_u32(dst, n);
        }
    }

    pub(crate) fn append_u64_cond(&self, dst: &mut Vec<u8>, n: u64) {
        if self.compact_ints {
            self.append_uint(dst, n);
        } else {
            self.append_u64(dst, n);
        }
    }

    pub(crate) fn append_i8_cond(&self, dst: &mut Vec<u8>, n: i8) {
        if self.compact_ints {
            self.append_int(dst, n as i64);
        } else {
            self.append_i8(dst, n);
        }
    }

    pub(crate) fn append_i16_cond(&self, dst: &mut Vec<u8>, n: i16) {
        if self.compact_ints {
            self.append_int(dst, n as i64);
        } else {
            self.append_i16(dst, n);
        }
    }

    pub(crate) fn append_i32_cond(&self, dst: &mut Vec<u8>, n: i32) {
        if self.compact_ints {
            self.append_int(dst, n as i64);
        } else {
            self.append_i32(dst, n);
        }
    }

    pub(crate) fn append_i64_cond(&self, dst: &mut Vec<u8>, n: i64) {
        if self.compact_ints {
            self.append_int(dst, n);
        } else {
            self.append_i64(dst, n);
        }
    }

    // ------------------------------------------------------------------
    // Floats
    // ------------------------------------------------------------------

    pub fn append_f32(&self, dst: &mut Vec<u8>, n: f32) {
        if self.compact_floats {
            if let Some(int) = exact_i64(n as f64) {
                self.append_int(dst, int);
                return;
            }
        }
        dst.push(code::FLOAT);
        dst.extend_from_slice(&n.to_bits().to_be_bytes());
    }

    pub fn append_f64(&self, dst: &mut Vec<u8>, n: f64) {
        if self.compact_floats {
            if let Some(int) = exact_i64(n) {
                self.append_int(dst, int);
                return;
            }
        }
        dst.push(code::DOUBLE);
        dst.extend_from_slice(&n.to_bits().to_be_bytes());
    }

    // ------------------------------------------------------------------
    // Strings and binary
    // ------------------------------------------------------------------

    pub fn append_str_len(&self, dst: &mut Vec<u8>, len: usize) {
        if len <= code::FIXED_STR_MASK as usize {
            dst.push(code::FIXED_STR_LOW | len as u8);
        } else if len <= u8::MAX as usize {
            dst.extend_from_slice(&[code::STR8, len as u8]);
        } else {
            self.append_len_16_32(dst, code::STR16, code::STR32, len);
        }
    }

    /// Appends a string. The bytes are written as-is.
    pub fn append_str(&self, dst: &mut Vec<u8>, value: &str) {
        self.append_str_len(dst, value.len());
        dst.extend_from_slice(value.as_bytes());
    }

    pub fn append_bytes_len(&self, dst: &mut Vec<u8>, len: usize) {
        if len <= u8::MAX as usize {
            dst.extend_from_slice(&[code::BIN8, len as u8]);
        } else {
            self.append_len_16_32(dst, code::BIN16, code::BIN32, len);
        }
    }

    /// Appends a binary blob; `None` is written as nil.
    pub fn append_bytes(&self, dst: &mut Vec<u8>, value: Option<&[u8]>) {
        match value {
            None => self.append_nil(dst),
            Some(bytes) => {
                self.append_bytes_len(dst, bytes.len());
                dst.extend_from_slice(bytes);
            }
        }
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    pub fn append_array_len(&self, dst: &mut Vec<u8>, len: usize) {
        if len <= code::FIXED_ARRAY_MASK as usize {
            dst.push(code::FIXED_ARRAY_LOW | len as u8);
        } else {
            self.append_len_16_32(dst, code::ARRAY16, code::ARRAY32, len);
        }
    }

    pub fn append_map_len(&self, dst: &mut Vec<u8>, len: usize) {
        if len <= code::FIXED_MAP_MASK as usize {
            dst.push(code::FIXED_MAP_LOW | len as u8);
        } else {
            self.append_len_16_32(dst, code::MAP16, code::MAP32, len);
        }
    }

    /// Appends an array of strings; `None` is written as nil.
    pub fn append_str_array<S: AsRef<str>>(&self, dst: &mut Vec<u8>, values: Option<&[S]>) {
        let Some(values) = values else {
            self.append_nil(dst);
            return;
        };
        self.append_array_len(dst, values.len());
        for value in values {
            self.append_str(dst, value.as_ref());
        }
    }

    /// Appends an array of encodable values; `None` is written as nil.
    pub fn append_array<T: Encode>(&self, dst: &mut Vec<u8>, values: Option<&[T]>) {
        let Some(values) = values else {
            self.append_nil(dst);
            return;
        };
        self.append_array_len(dst, values.len());
        for value in values {
            value.encode(self, dst);
        }
    }

    /// Appends a string-keyed map from its entries.
    ///
    /// With [`Encoder::sort_map_keys`] on, entries are written in increasing
    /// key order; duplicate keys are kept.
    pub fn append_map<'m, K, V, I>(&self, dst: &mut Vec<u8>, entries: I)
    where
        K: AsRef<str> + ?Sized + 'm,
        V: Encode + ?Sized + 'm,
        I: ExactSizeIterator<Item = (&'m K, &'m V)>,
    {
        self.append_map_len(dst, entries.len());
        if self.sort_map_keys {
            let mut sorted: Vec<(&K, &V)> = entries.collect();
            sorted.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));
            for (key, value) in sorted {
                self.append_str(dst, key.as_ref());
                value.encode(self, dst);
            }
        } else {
            for (key, value) in entries {
                self.append_str(dst, key.as_ref());
                value.encode(self, dst);
            }
        }
    }

    // ------------------------------------------------------------------
    // Extensions
    // ------------------------------------------------------------------

    /// Appends the header of an extension with a `len`-byte body. The caller
    /// writes the body.
    pub fn append_ext_header(&self, dst: &mut Vec<u8>, type_id: i8, len: usize) {
        match len {
            1 => dst.push(code::FIX_EXT1),
            2 => dst.push(code::FIX_EXT2),
            4 => dst.push(code::FIX_EXT4),
            8 => dst.push(code::FIX_EXT8),
            16 => dst.push(code::FIX_EXT16),
            _ if len <= u8::MAX as usize => dst.extend_from_slice(&[code::EXT8, len as u8]),
            _ => self.append_len_16_32(dst, code::EXT16, code::EXT32, len),
        }
        dst.push(type_id as u8);
    }

    /// Appends a complete extension value.
    pub fn append_ext(&self, dst: &mut Vec<u8>, type_id: i8, data: &[u8]) {
        self.append_ext_header(dst, type_id, data.len());
        dst.extend_from_slice(data);
    }

    fn append_len_16_32(&self, dst: &mut Vec<u8>, code16: u8, code32: u8, len: usize) {
        if len <= u16::MAX as usize {
            dst.push(code16);
            dst.extend_from_slice(&(len as u16).to_be_bytes());
        } else {
            debug_assert!(len <= u32::MAX as usize, "length {len} does not fit 32 bits");
            dst.push(code32);
            dst.extend_from_slice(&(len as u32).to_be_bytes());
        }
    }
}

/// The integer value of `n` when it has one that fits `i64`. NaN and ±Inf
/// fail the range check.
fn exact_i64(n: f64) -> Option<i64> {
    // 2^63 itself is out of range, -2^63 is not.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n >= -LIMIT && n < LIMIT && n.fract() == 0.0 {
        Some(n as i64)
    } else {
        None
    }
}
