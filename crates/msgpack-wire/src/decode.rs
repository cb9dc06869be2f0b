//! [`Decode`]: the closed set of types the decoder produces directly.
//!
//! Fixed-width integers and `f32` require their exact wire code, the way
//! the width-preserving encoder writes them. `usize`/`isize`, `f64` and the
//! duration types accept any compatible encoding.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;

use crate::code;
use crate::error::{Error, Result};
use crate::value::{StrMap, ValueMap};
use crate::{Decoder, Timestamp, Value};

/// A type that can be read from a [`Decoder`].
pub trait Decode<'a>: Sized {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self>;
}

impl<'a> Decoder<'a> {
    /// Decodes the next value as `T`.
    pub fn decode<T: Decode<'a>>(&mut self) -> Result<T> {
        self.atomic(T::decode)
    }

    /// Decodes consecutive values into a tuple, all or nothing.
    ///
    /// ```
    /// use msgpack_wire::{Decoder, Encoder};
    ///
    /// let enc = Encoder::new();
    /// let mut buf = Vec::new();
    /// enc.append_multi(&mut buf, &[&"id", &7u32, &true]);
    ///
    /// let mut dec = Decoder::new(&buf);
    /// let (key, id, flag): (String, u32, bool) = dec.decode_multi().unwrap();
    /// assert_eq!((key.as_str(), id, flag), ("id", 7, true));
    /// ```
    pub fn decode_multi<T: Decode<'a>>(&mut self) -> Result<T> {
        self.decode()
    }
}

macro_rules! impl_decode {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl<'a> Decode<'a> for $ty {
                fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
                    dec.$method()
                }
            }
        )*
    };
}

impl_decode! {
    bool => decode_bool,
    u8 => decode_u8,
    u16 => decode_u16,
    u32 => decode_u32,
    u64 => decode_u64,
    i8 => decode_i8,
    i16 => decode_i16,
    i32 => decode_i32,
    i64 => decode_i64,
    f32 => decode_f32,
    f64 => decode_f64,
    Timestamp => decode_time,
    TimeDelta => decode_duration,
}

impl<'a> Decode<'a> for Cow<'a, str> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        dec.decode_str()
    }
}

/// Follows the decoder's loose flag.
impl<'a> Decode<'a> for Value<'a> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        dec.decode_dynamic()
    }
}

impl<'a> Decode<'a> for usize {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        let n = dec.decode_uint()?;
        usize::try_from(n).map_err(|_| Error::IntegerOverflow {
            value: n as i128,
            target: "usize",
        })
    }
}

impl<'a> Decode<'a> for isize {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        let n = dec.decode_int()?;
        isize::try_from(n).map_err(|_| Error::IntegerOverflow {
            value: n as i128,
            target: "isize",
        })
    }
}

/// Nil decodes as `None`.
impl<'a, T: Decode<'a>> Decode<'a> for Option<T> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        if dec.peek_tag()? == code::NIL {
            dec.decode_nil()?;
            return Ok(None);
        }
        T::decode(dec).map(Some)
    }
}

impl<'a> Decode<'a> for String {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        dec.decode_str().map(Cow::into_owned)
    }
}

impl<'a> Decode<'a> for Cow<'a, [u8]> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        Ok(dec.decode_bytes()?.unwrap_or_default())
    }
}

impl<'a> Decode<'a> for Vec<u8> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        Ok(dec.decode_bytes()?.map(Cow::into_owned).unwrap_or_default())
    }
}

impl<'a> Decode<'a> for Vec<String> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        let items = dec.decode_str_array()?.unwrap_or_default();
        Ok(items.into_iter().map(Cow::into_owned).collect())
    }
}

impl<'a> Decode<'a> for Vec<Value<'a>> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        Ok(dec.decode_array()?.unwrap_or_default())
    }
}

impl<'a> Decode<'a> for StrMap<'a> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        Ok(dec.decode_map()?.unwrap_or_default())
    }
}

impl<'a> Decode<'a> for ValueMap<'a> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        Ok(dec.decode_untyped_map()?.unwrap_or_default())
    }
}

impl<'a, S: BuildHasher + Default> Decode<'a> for HashMap<String, String, S> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        let map = dec.decode_str_map()?.unwrap_or_default();
        Ok(map
            .into_iter()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect())
    }
}

impl<'a> Decode<'a> for IndexMap<String, String> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        let map = dec.decode_str_map()?.unwrap_or_default();
        Ok(map
            .into_iter()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect())
    }
}

impl<'a> Decode<'a> for BTreeMap<String, String> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        let map = dec.decode_str_map()?.unwrap_or_default();
        Ok(map
            .into_iter()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect())
    }
}

impl<'a> Decode<'a> for DateTime<Utc> {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        dec.decode_time()?.to_datetime()
    }
}

impl<'a> Decode<'a> for SystemTime {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        dec.decode_time()?.to_system_time()
    }
}

/// Negative durations do not fit and fail with [`Error::IntegerOverflow`].
impl<'a> Decode<'a> for Duration {
    fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
        let n = dec.decode_int()?;
        u64::try_from(n)
            .map(Duration::from_nanos)
            .map_err(|_| Error::IntegerOverflow {
                value: n as i128,
                target: "Duration",
            })
    }
}

macro_rules! impl_decode_tuple {
    ($($name:ident),+) => {
        impl<'a, $($name: Decode<'a>),+> Decode<'a> for ($($name,)+) {
            fn decode(dec: &mut Decoder<'a>) -> Result<Self> {
                Ok(($($name::decode(dec)?,)+))
            }
        }
    };
}

impl_decode_tuple!(A);
impl_decode_tuple!(A, B);
impl_decode_tuple!(A, B, C);
impl_decode_tuple!(A, B, C, D);
impl_decode_tuple!(A, B, C, D, E);
impl_decode_tuple!(A, B, C, D, E, F);
