use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use msgpack_wire::{
    Decoder, Encoder, Error, MapDecoder, Result, Timestamp, UntypedMaps, Value, MAX_DEPTH,
};

#[test]
fn strict_keeps_wire_kinds() {
    let enc = Encoder::new();
    let mut buf = Vec::new();
    buf.push(0x05);
    enc.append_u8(&mut buf, 200);
    enc.append_i16(&mut buf, -300);
    enc.append_u64(&mut buf, 1);
    enc.append_f32(&mut buf, 0.5);
    enc.append_bytes(&mut buf, Some(&b"ab"[..]));
    enc.append_str(&mut buf, "ab");
    enc.append_nil(&mut buf);

    let mut dec = Decoder::new(&buf);
    let expected = [
        Value::I8(5),
        Value::U8(200),
        Value::I16(-300),
        Value::U64(1),
        Value::F32(0.5),
        Value::Bin(Cow::Borrowed(b"ab")),
        Value::from("ab"),
        Value::Nil,
    ];
    for want in expected {
        assert_eq!(dec.decode_value().unwrap(), want);
    }
    assert!(dec.is_empty());
}

#[test]
fn loose_widens() {
    let enc = Encoder::new();
    let mut buf = Vec::new();
    buf.push(0xfb);
    enc.append_u8(&mut buf, 200);
    enc.append_i16(&mut buf, -300);
    enc.append_f32(&mut buf, 0.5);
    enc.append_bytes(&mut buf, Some(&b"ab"[..]));

    let mut dec = Decoder::new(&buf);
    let expected = [
        Value::I64(-5),
        Value::U64(200),
        Value::I64(-300),
        Value::F64(0.5),
        Value::from("ab"),
    ];
    for want in expected {
        assert_eq!(dec.decode_value_loose().unwrap(), want);
    }
}

#[test]
fn loose_bin_is_string_only_when_utf8() {
    let buf = [0xc4, 0x02, 0xff, 0xfe];
    assert_eq!(
        Decoder::new(&buf).decode_value_loose().unwrap(),
        Value::Bin(Cow::Borrowed(&[0xff, 0xfe]))
    );

    let mut dec = Decoder::new(&buf);
    dec.set_zero_copy(true);
    assert_eq!(
        dec.decode_value_loose().unwrap(),
        Value::Bin(Cow::Borrowed(&[0xff, 0xfe]))
    );

    // Inside containers too.
    let buf = [0x92, 0xc4, 0x01, b'a', 0xc4, 0x01, 0x80];
    assert_eq!(
        Decoder::new(&buf).decode_value_loose().unwrap(),
        Value::Array(vec![Value::from("a"), Value::Bin(Cow::Borrowed(&[0x80]))])
    );
}

#[test]
fn mode_applies_to_nested_values() {
    // [1, uint8 2, {"k": int8 3}]
    let buf = [0x93, 0x01, 0xcc, 0x02, 0x81, 0xa1, b'k', 0xd0, 0x03];

    let loose = Decoder::new(&buf).decode_value_loose().unwrap();
    let mut map = IndexMap::new();
    map.insert(Cow::Borrowed("k"), Value::I64(3));
    assert_eq!(
        loose,
        Value::Array(vec![Value::I64(1), Value::U64(2), Value::Map(map)])
    );

    // The flag picks the mode for decode_dynamic, but decode_value is
    // always strict.
    let mut dec = Decoder::new(&buf);
    dec.set_loose(true);
    let strict = dec.decode_value().unwrap();
    assert_eq!(strict.as_array().unwrap()[1], Value::U8(2));
    assert!(dec.is_loose());

    dec.reset(&buf);
    let dynamic = dec.decode_dynamic().unwrap();
    assert_eq!(dynamic, loose);
}

#[test]
fn default_maps_need_string_keys() {
    let buf = [0x81, 0x01, 0xc0];
    let mut dec = Decoder::new(&buf);
    assert!(matches!(
        dec.decode_value(),
        Err(Error::UnexpectedTag {
            tag: 0x01,
            expected: "string"
        })
    ));
    assert_eq!(dec.position(), 0);
}

#[test]
fn untyped_maps_strategy() {
    // [{1: "a", nil: true}]
    let buf = [0x91, 0x82, 0x01, 0xa1, b'a', 0xc0, 0xc3];
    let mut dec = Decoder::new(&buf);
    dec.set_map_decoder(Some(Arc::new(UntypedMaps)));
    let value = dec.decode_value().unwrap();

    let mut expected = IndexMap::new();
    expected.insert(Value::I8(1), Value::from("a"));
    expected.insert(Value::Nil, Value::Bool(true));
    assert_eq!(value, Value::Array(vec![Value::AnyMap(expected)]));

    dec.set_map_decoder(None);
    dec.reset(&buf);
    assert!(dec.decode_value().is_err());
}

fn count_entries<'a>(dec: &mut Decoder<'a>) -> Result<Value<'a>> {
    let n = dec.decode_map_len()?.unwrap_or(0);
    for _ in 0..n * 2 {
        dec.skip()?;
    }
    Ok(Value::U32(n as u32))
}

#[test]
fn custom_map_strategy() {
    let enc = Encoder::new();
    let mut inner = IndexMap::new();
    inner.insert("a", 1u8);
    inner.insert("b", 2u8);
    let mut buf = Vec::new();
    enc.append_array_len(&mut buf, 2);
    enc.append(&mut buf, &inner);
    enc.append(&mut buf, "tail");

    let strategy: Arc<dyn MapDecoder> = Arc::new(count_entries);
    let mut dec = Decoder::new(&buf);
    dec.set_map_decoder(Some(strategy));
    assert_eq!(
        dec.decode_value().unwrap(),
        Value::Array(vec![Value::U32(2), Value::from("tail")])
    );
}

#[test]
fn duplicate_keys_keep_last_value() {
    let buf = [0x83, 0xa1, b'a', 0x01, 0xa1, b'b', 0x02, 0xa1, b'a', 0x03];
    let map = Decoder::new(&buf).decode_map().unwrap().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_index(0), Some((&Cow::Borrowed("a"), &Value::I8(3))));
    assert_eq!(map["b"], Value::I8(2));
}

#[test]
fn extensions() {
    let enc = Encoder::new();
    let mut buf = Vec::new();
    enc.append_ext(&mut buf, 42, &[1, 2, 3]);
    enc.append_time(&mut buf, Timestamp::new(7, 0));
    enc.append_ext(&mut buf, 13, &7u32.to_be_bytes());
    enc.append_ext(&mut buf, -1, &[0, 0, 0]);

    for loose in [false, true] {
        let mut dec = Decoder::new(&buf);
        dec.set_loose(loose);
        assert_eq!(
            dec.decode_dynamic().unwrap(),
            Value::Ext {
                type_id: 42,
                data: Cow::Borrowed(&[1, 2, 3])
            }
        );
        assert_eq!(
            dec.decode_dynamic().unwrap(),
            Value::Timestamp(Timestamp::new(7, 0))
        );
        assert_eq!(
            dec.decode_dynamic().unwrap(),
            Value::Timestamp(Timestamp::new(7, 0))
        );
        assert!(matches!(dec.decode_dynamic(), Err(Error::InvalidExtLen(3))));
    }
}

#[test]
fn unknown_code() {
    assert!(matches!(
        Decoder::new(&[0xc1]).decode_value(),
        Err(Error::UnexpectedTag {
            tag: 0xc1,
            expected: "value"
        })
    ));
}

#[test]
fn collection_helpers() {
    let buf = [0xc0, 0x92, 0xc3, 0xa1, b'x', 0x81, 0xa1, b'k', 0xa1, b'v'];
    let mut dec = Decoder::new(&buf);
    assert_eq!(dec.decode_array().unwrap(), None);
    assert_eq!(
        dec.decode_array().unwrap(),
        Some(vec![Value::Bool(true), Value::from("x")])
    );
    let map = dec.decode_str_map().unwrap().unwrap();
    assert_eq!(map["k"], "v");

    let mut dec = Decoder::new(&[0xc0, 0x81, 0x02, 0x03]);
    assert_eq!(dec.decode_untyped_map().unwrap(), None);
    let map = dec.decode_untyped_map().unwrap().unwrap();
    assert_eq!(map[&Value::I8(2)], Value::I8(3));
}

#[test]
fn value_roundtrip_preserves_widths() {
    let mut map = IndexMap::new();
    map.insert(Cow::Borrowed("i16"), Value::I16(-2));
    map.insert(Cow::Borrowed("u32"), Value::U32(9));
    map.insert(Cow::Borrowed("f64"), Value::F64(f64::NAN));
    map.insert(
        Cow::Borrowed("list"),
        Value::Array(vec![Value::Nil, Value::Bin(Cow::Owned(vec![0; 3]))]),
    );
    map.insert(Cow::Borrowed("at"), Value::Timestamp(Timestamp::new(1 << 35, 9)));
    let value = Value::Map(map);

    let buf = Encoder::new().encode(&value);
    let decoded = msgpack_wire::decode_value(&buf).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(value.clone().into_owned(), value);
}

#[test]
fn nesting_is_bounded() {
    let deep = vec![0x91u8; 200_000];

    let mut dec = Decoder::new(&deep);
    assert!(matches!(dec.skip(), Err(Error::DepthLimit(MAX_DEPTH))));
    assert_eq!(dec.position(), 0);
    assert!(matches!(dec.decode_value(), Err(Error::DepthLimit(_))));
    assert!(matches!(dec.decode_value_loose(), Err(Error::DepthLimit(_))));
    assert_eq!(dec.position(), 0);

    // {"": {"": ...}}
    let deep_maps: Vec<u8> = [0x81, 0xa0].repeat(100_000);
    let mut dec = Decoder::new(&deep_maps);
    assert!(matches!(dec.skip(), Err(Error::DepthLimit(_))));
    assert!(matches!(dec.decode_value(), Err(Error::DepthLimit(_))));
    dec.set_map_decoder(Some(Arc::new(UntypedMaps)));
    assert!(matches!(dec.decode_value(), Err(Error::DepthLimit(_))));
}

#[test]
fn nesting_up_to_the_limit_decodes() {
    let mut buf = vec![0x91u8; MAX_DEPTH];
    buf.push(0xc0);

    let mut dec = Decoder::new(&buf);
    dec.skip().unwrap();
    assert!(dec.is_empty());

    dec.reset(&buf);
    let mut value = dec.decode_value().unwrap();
    let mut levels = 0;
    while let Value::Array(mut items) = value {
        levels += 1;
        value = items.pop().unwrap();
    }
    assert_eq!(levels, MAX_DEPTH);
    assert_eq!(value, Value::Nil);

    // The failed call leaves the decoder usable at full depth.
    let mut over = vec![0x91u8; MAX_DEPTH + 1];
    over.push(0xc0);
    let mut dec = Decoder::new(&over);
    assert!(dec.decode_value().is_err());
    dec.reset(&buf);
    assert!(dec.skip().is_ok());
}
