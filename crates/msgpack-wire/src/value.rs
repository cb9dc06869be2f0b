//! [`Value`]: dynamically typed MessagePack value.
//!
//! Strings and binary blobs are [`Cow`]s: a decoder in zero-copy mode returns
//! them borrowed from the input buffer, otherwise they are owned copies.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::Timestamp;

/// Map with string keys, in wire order.
pub type StrMap<'a> = IndexMap<Cow<'a, str>, Value<'a>>;

/// Map with arbitrary keys, in wire order.
pub type ValueMap<'a> = IndexMap<Value<'a>, Value<'a>>;

/// A decoded MessagePack value.
///
/// Integer and float variants keep the width the wire used. Equality is
/// structural; floats compare by bit pattern so that `Value` can be a map key.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(Cow<'a, str>),
    Bin(Cow<'a, [u8]>),
    Array(Vec<Value<'a>>),
    Map(StrMap<'a>),
    AnyMap(ValueMap<'a>),
    /// Extension value other than a timestamp.
    Ext {
        type_id: i8,
        data: Cow<'a, [u8]>,
    },
    Timestamp(Timestamp),
}

impl<'a> Value<'a> {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer variant whose value fits `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(n) => Some(n as i64),
            Value::I16(n) => Some(n as i64),
            Value::I32(n) => Some(n as i64),
            Value::I64(n) => Some(n),
            Value::U8(n) => Some(n as i64),
            Value::U16(n) => Some(n as i64),
            Value::U32(n) => Some(n as i64),
            Value::U64(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Any non-negative integer variant.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::U64(n) => Some(n),
            _ => self.as_i64().and_then(|n| u64::try_from(n).ok()),
        }
    }

    /// Any numeric variant, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F32(n) => Some(n as f64),
            Value::F64(n) => Some(n),
            Value::U64(n) => Some(n as f64),
            _ => self.as_i64().map(|n| n as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bin(b) => Some(&**b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&StrMap<'a>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` in a string-keyed map, or in an any-keyed map under a
    /// string key.
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        match self {
            Value::Map(map) => map.get(key),
            Value::AnyMap(map) => map
                .iter()
                .find_map(|(k, v)| (k.as_str() == Some(key)).then_some(v)),
            _ => None,
        }
    }

    /// Detaches the value from the buffer it was decoded from.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Nil => Value::Nil,
            Value::Bool(b) => Value::Bool(b),
            Value::I8(n) => Value::I8(n),
            Value::I16(n) => Value::I16(n),
            Value::I32(n) => Value::I32(n),
            Value::I64(n) => Value::I64(n),
            Value::U8(n) => Value::U8(n),
            Value::U16(n) => Value::U16(n),
            Value::U32(n) => Value::U32(n),
            Value::U64(n) => Value::U64(n),
            Value::F32(n) => Value::F32(n),
            Value::F64(n) => Value::F64(n),
            Value::Str(s) => Value::Str(Cow::Owned(s.into_owned())),
            Value::Bin(b) => Value::Bin(Cow::Owned(b.into_owned())),
            Value::Array(items) => Value::Array(items.into_iter().map(Value::into_owned).collect()),
            Value::Map(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Cow::Owned(k.into_owned()), v.into_owned()))
                    .collect(),
            ),
            Value::AnyMap(map) => Value::AnyMap(
                map.into_iter()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect(),
            ),
            Value::Ext { type_id, data } => Value::Ext {
                type_id,
                data: Cow::Owned(data.into_owned()),
            },
            Value::Timestamp(ts) => Value::Timestamp(ts),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a.to_bits() == b.to_bits(),
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bin(a), Value::Bin(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::AnyMap(a), Value::AnyMap(b)) => a == b,
            (
                Value::Ext {
                    type_id: ta,
                    data: da,
                },
                Value::Ext {
                    type_id: tb,
                    data: db,
                },
            ) => ta == tb && da == db,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value<'_> {}

impl Hash for Value<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::I8(n) => n.hash(state),
            Value::I16(n) => n.hash(state),
            Value::I32(n) => n.hash(state),
            Value::I64(n) => n.hash(state),
            Value::U8(n) => n.hash(state),
            Value::U16(n) => n.hash(state),
            Value::U32(n) => n.hash(state),
            Value::U64(n) => n.hash(state),
            Value::F32(n) => n.to_bits().hash(state),
            Value::F64(n) => n.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bin(b) => b.hash(state),
            Value::Array(items) => items.hash(state),
            // Map equality ignores entry order, so only the size is hashed.
            Value::Map(map) => map.len().hash(state),
            Value::AnyMap(map) => map.len().hash(state),
            Value::Ext { type_id, data } => {
                type_id.hash(state);
                data.hash(state);
            }
            Value::Timestamp(ts) => ts.hash(state),
        }
    }
}

impl Default for Value<'_> {
    fn default() -> Self {
        Value::Nil
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Timestamp => Timestamp,
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Str(Cow::Owned(s))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(b: &'a [u8]) -> Self {
        Value::Bin(Cow::Borrowed(b))
    }
}

impl From<Vec<u8>> for Value<'_> {
    fn from(b: Vec<u8>) -> Self {
        Value::Bin(Cow::Owned(b))
    }
}

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    fn from(items: Vec<Value<'a>>) -> Self {
        Value::Array(items)
    }
}

impl<'a> From<StrMap<'a>> for Value<'a> {
    fn from(map: StrMap<'a>) -> Self {
        Value::Map(map)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
