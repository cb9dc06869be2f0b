//! MessagePack encoder and decoder.
//!
//! [`Encoder`] appends values to a caller-owned `Vec<u8>` and holds only
//! configuration. [`Decoder`] reads values back through a cursor over a
//! borrowed buffer, either into known types or into the dynamic [`Value`].
//! Input is treated as untrusted: truncated data fails with
//! [`Error::ShortBuffer`] or [`Error::EndOfInput`] and lengths read off the
//! wire never drive preallocation beyond [`ALLOC_LIMIT`].
//!
//! # Example
//!
//! ```
//! use indexmap::IndexMap;
//! use msgpack_wire::{Decoder, Encoder, Value};
//!
//! let mut doc = IndexMap::new();
//! doc.insert("name", Value::from("ada"));
//! doc.insert("year", Value::U16(1843));
//!
//! let buf = Encoder::new().sort_map_keys(true).encode(&doc);
//!
//! let mut dec = Decoder::new(&buf);
//! let value = dec.decode_value().unwrap();
//! assert_eq!(value.get("name").and_then(Value::as_str), Some("ada"));
//! assert_eq!(value.get("year"), Some(&Value::U16(1843)));
//! ```

pub mod code;
mod decode;
mod decoder;
mod dynamic;
mod encode;
mod encoder;
mod error;
mod pool;
mod skip;
mod timestamp;
pub mod to_json;
mod value;

pub use decode::Decode;
pub use decoder::{Decoder, MAX_DEPTH};
pub use dynamic::{MapDecoder, UntypedMaps, ALLOC_LIMIT};
pub use encode::Encode;
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use pool::{DecoderPool, PooledDecoder};
pub use timestamp::{Timestamp, ALT_EXT_ID as TIMESTAMP_ALT_EXT_ID, EXT_ID as TIMESTAMP_EXT_ID};
pub use value::{StrMap, Value, ValueMap};

/// Encodes `value` with the default encoder.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    Encoder::default().encode(value)
}

/// Appends `value` to `dst` with the default encoder.
pub fn append<T: Encode + ?Sized>(dst: &mut Vec<u8>, value: &T) {
    Encoder::default().append(dst, value);
}

/// Decodes the first value in `data` strictly, borrowing nothing.
pub fn decode_value(data: &[u8]) -> Result<Value<'static>> {
    Decoder::new(data).decode_value().map(Value::into_owned)
}

/// Decodes the first value in `data` as `T`.
pub fn decode<'a, T: Decode<'a>>(data: &'a [u8]) -> Result<T> {
    Decoder::new(data).decode()
}
