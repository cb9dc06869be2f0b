//! [`Encode`]: the closed set of types the encoder accepts.
//!
//! Integers go through the width-preserving or compact rule depending on the
//! encoder's `compact_ints` flag. `usize`/`isize` have no fixed wire width and
//! always use the compact rule.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, TimeDelta, TimeZone};
use indexmap::IndexMap;

use crate::{Encoder, Timestamp, Value};

/// A value with a MessagePack encoding.
pub trait Encode {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>);
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        (**self).encode(enc, dst);
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        match self {
            Some(value) => value.encode(enc, dst),
            None => enc.append_nil(dst),
        }
    }
}

impl Encode for bool {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_bool(dst, *self);
    }
}

macro_rules! impl_encode_int {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
                    enc.$method(dst, *self);
                }
            }
        )*
    };
}

impl_encode_int! {
    u8 => append_u8_cond,
    u16 => append_u16_cond,
    u32 => append_u32_cond,
    u64 => append_u64_cond,
    i8 => append_i8_cond,
    i16 => append_i16_cond,
    i32 => append_i32_cond,
    i64 => append_i64_cond,
    f32 => append_f32,
    f64 => append_f64,
}

impl Encode for usize {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_uint(dst, *self as u64);
    }
}

impl Encode for isize {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_int(dst, *self as i64);
    }
}

impl Encode for str {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_str(dst, self);
    }
}

impl Encode for String {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_str(dst, self);
    }
}

impl Encode for Cow<'_, str> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_str(dst, self);
    }
}

impl Encode for [u8] {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_bytes(dst, Some(self));
    }
}

impl Encode for Vec<u8> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_bytes(dst, Some(self.as_slice()));
    }
}

impl Encode for [String] {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_str_array(dst, Some(self));
    }
}

impl Encode for Vec<String> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_str_array(dst, Some(self.as_slice()));
    }
}

impl Encode for [&str] {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_str_array(dst, Some(self));
    }
}

impl Encode for Vec<&str> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_str_array(dst, Some(self.as_slice()));
    }
}

impl Encode for [Value<'_>] {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_array(dst, Some(self));
    }
}

impl Encode for Vec<Value<'_>> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_array(dst, Some(self.as_slice()));
    }
}

impl<K: AsRef<str>, V: Encode, S: BuildHasher> Encode for HashMap<K, V, S> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_map(dst, self.iter());
    }
}

impl<K: AsRef<str>, V: Encode, S: BuildHasher> Encode for IndexMap<K, V, S> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_map(dst, self.iter());
    }
}

impl<K: AsRef<str>, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_map(dst, self.iter());
    }
}

impl Encode for Timestamp {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_time(dst, *self);
    }
}

impl<Tz: TimeZone> Encode for DateTime<Tz> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_time(dst, Timestamp::from(self));
    }
}

impl Encode for SystemTime {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_time(dst, Timestamp::from(*self));
    }
}

/// Durations are signed nanosecond counts, saturating at the `i64` range.
impl Encode for Duration {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        enc.append_duration(dst, *self);
    }
}

impl Encode for TimeDelta {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        let nanos = self.num_nanoseconds().unwrap_or(if *self < TimeDelta::zero() {
            i64::MIN
        } else {
            i64::MAX
        });
        enc.append_i64_cond(dst, nanos);
    }
}

impl Encode for Value<'_> {
    fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
        match self {
            Value::Nil => enc.append_nil(dst),
            Value::Bool(b) => enc.append_bool(dst, *b),
            Value::I8(n) => enc.append_i8_cond(dst, *n),
            Value::I16(n) => enc.append_i16_cond(dst, *n),
            Value::I32(n) => enc.append_i32_cond(dst, *n),
            Value::I64(n) => enc.append_i64_cond(dst, *n),
            Value::U8(n) => enc.append_u8_cond(dst, *n),
            Value::U16(n) => enc.append_u16_cond(dst, *n),
            Value::U32(n) => enc.append_u32_cond(dst, *n),
            Value::U64(n) => enc.append_u64_cond(dst, *n),
            Value::F32(n) => enc.append_f32(dst, *n),
            Value::F64(n) => enc.append_f64(dst, *n),
            Value::Str(s) => enc.append_str(dst, s),
            Value::Bin(b) => enc.append_bytes(dst, Some(b.as_ref())),
            Value::Array(items) => enc.append_array(dst, Some(items.as_slice())),
            Value::Map(map) => enc.append_map(dst, map.iter()),
            Value::AnyMap(map) => {
                enc.append_map_len(dst, map.len());
                for (key, value) in map {
                    key.encode(enc, dst);
                    value.encode(enc, dst);
                }
            }
            Value::Ext { type_id, data } => enc.append_ext(dst, *type_id, data),
            Value::Timestamp(ts) => enc.append_time(dst, *ts),
        }
    }
}

impl Encoder {
    /// Appends a dynamic value. The match over [`Value`] is exhaustive, so
    /// there is no unsupported kind to report.
    pub fn append_value(&self, dst: &mut Vec<u8>, value: &Value<'_>) {
        value.encode(self, dst);
    }

    /// Appends a duration as signed nanoseconds.
    pub fn append_duration(&self, dst: &mut Vec<u8>, d: Duration) {
        let nanos = i64::try_from(d.as_nanos()).unwrap_or(i64::MAX);
        self.append_i64_cond(dst, nanos);
    }
}
