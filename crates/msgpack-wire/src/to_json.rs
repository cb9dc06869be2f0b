//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON has no binary type, so binary blobs and extension bodies become
//! base64 data URIs:
//!
//! - `Value::Bin` ↔ `"data:application/octet-stream;base64,<base64>"`
//! - `Value::Ext` ↔ `"data:application/msgpack;base64;ext=<type>,<base64>"`
//!
//! Timestamps become RFC 3339 strings, non-finite floats become `null`, and
//! keys of [`Value::AnyMap`] that are not strings are written as their JSON
//! text.

use std::borrow::Cow;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::SecondsFormat;
use serde_json::{Map, Number, Value as JsonValue};

use crate::Value;

pub const BIN_URI_START: &str = "data:application/octet-stream;base64,";
pub const EXT_URI_START: &str = "data:application/msgpack;base64;ext=";

impl Value<'_> {
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Nil => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::I8(n) => JsonValue::from(*n),
            Value::I16(n) => JsonValue::from(*n),
            Value::I32(n) => JsonValue::from(*n),
            Value::I64(n) => JsonValue::from(*n),
            Value::U8(n) => JsonValue::from(*n),
            Value::U16(n) => JsonValue::from(*n),
            Value::U32(n) => JsonValue::from(*n),
            Value::U64(n) => JsonValue::from(*n),
            Value::F32(n) => float(*n as f64),
            Value::F64(n) => float(*n),
            Value::Str(s) => JsonValue::String(s.to_string()),
            Value::Bin(b) => JsonValue::String(format!("{BIN_URI_START}{}", STANDARD.encode(b))),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Value::AnyMap(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (json_key(k), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Value::Ext { type_id, data } => JsonValue::String(format!(
                "{EXT_URI_START}{type_id},{}",
                STANDARD.encode(data)
            )),
            Value::Timestamp(ts) => match ts.to_datetime() {
                Ok(dt) => JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
                Err(_) => JsonValue::Null,
            },
        }
    }
}

fn float(n: f64) -> JsonValue {
    Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
}

fn json_key(key: &Value<'_>) -> String {
    match key {
        Value::Str(s) => s.to_string(),
        other => other.to_json().to_string(),
    }
}

impl From<&Value<'_>> for JsonValue {
    fn from(value: &Value<'_>) -> Self {
        value.to_json()
    }
}

impl From<Value<'_>> for JsonValue {
    fn from(value: Value<'_>) -> Self {
        value.to_json()
    }
}

/// Numbers become `I64`, `U64` or `F64`; data URI strings written by
/// [`Value::to_json`] turn back into binary and extension values.
impl From<JsonValue> for Value<'static> {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Nil,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::U64(u)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => from_json_string(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Cow::Owned(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn from_json_string(s: String) -> Value<'static> {
    if let Some(b64) = s.strip_prefix(BIN_URI_START) {
        if let Ok(bytes) = STANDARD.decode(b64) {
            return Value::Bin(Cow::Owned(bytes));
        }
    } else if let Some(rest) = s.strip_prefix(EXT_URI_START) {
        if let Some((type_id, b64)) = rest.split_once(',') {
            if let (Ok(type_id), Ok(data)) = (type_id.parse::<i8>(), STANDARD.decode(b64)) {
                return Value::Ext {
                    type_id,
                    data: Cow::Owned(data),
                };
            }
        }
    }
    Value::Str(Cow::Owned(s))
}
