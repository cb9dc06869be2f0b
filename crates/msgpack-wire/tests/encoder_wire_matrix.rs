use std::collections::BTreeMap;
use std::time::Duration;

use indexmap::IndexMap;
use msgpack_wire::{Encode, Encoder, Value};

fn bytes_of(f: impl FnOnce(&Encoder, &mut Vec<u8>)) -> Vec<u8> {
    let mut buf = Vec::new();
    f(&Encoder::new(), &mut buf);
    buf
}

#[test]
fn nil_and_bool() {
    assert_eq!(bytes_of(|e, b| e.append_nil(b)), [0xc0]);
    assert_eq!(bytes_of(|e, b| e.append_bool(b, false)), [0xc2]);
    assert_eq!(bytes_of(|e, b| e.append_bool(b, true)), [0xc3]);
}

#[test]
fn minimal_width_integers() {
    let cases: &[(i64, &[u8])] = &[
        (0, &[0x00]),
        (127, &[0x7f]),
        (128, &[0xcc, 0x80]),
        (255, &[0xcc, 0xff]),
        (256, &[0xcd, 0x01, 0x00]),
        (65_536, &[0xce, 0x00, 0x01, 0x00, 0x00]),
        (-1, &[0xff]),
        (-32, &[0xe0]),
        (-33, &[0xd0, 0xdf]),
        (-129, &[0xd1, 0xff, 0x7f]),
        (-32_769, &[0xd2, 0xff, 0xff, 0x7f, 0xff]),
        (
            i64::MIN,
            &[0xd3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ),
    ];
    for (n, expected) in cases {
        assert_eq!(&bytes_of(|e, b| e.append_int(b, *n)), expected, "{n}");
    }
    assert_eq!(
        bytes_of(|e, b| e.append_uint(b, u64::MAX)),
        [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
    assert_eq!(
        bytes_of(|e, b| e.append_uint(b, 1 << 32)),
        [0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn fixed_width_integers_ignore_configuration() {
    let enc = Encoder::new().compact_ints(true);
    let mut buf = Vec::new();
    enc.append_u8(&mut buf, 1);
    enc.append_u16(&mut buf, 1);
    enc.append_i32(&mut buf, -1);
    assert_eq!(
        buf,
        [0xcc, 0x01, 0xcd, 0x00, 0x01, 0xd2, 0xff, 0xff, 0xff, 0xff]
    );

    let mut buf = Vec::new();
    enc.append_i64(&mut buf, -1);
    assert_eq!(buf, [0xd3, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
}

#[test]
fn generic_integers_follow_compact_flag() {
    let plain = Encoder::new();
    let compact = Encoder::new().compact_ints(true);

    assert_eq!(plain.encode(&5i32), [0xd2, 0x00, 0x00, 0x00, 0x05]);
    assert_eq!(compact.encode(&5i32), [0x05]);
    assert_eq!(plain.encode(&300u16), [0xcd, 0x01, 0x2c]);
    assert_eq!(compact.encode(&300u64), [0xcd, 0x01, 0x2c]);
    assert_eq!(plain.encode(&-3i8), [0xd0, 0xfd]);
    assert_eq!(compact.encode(&-3i8), [0xfd]);

    // No fixed wire width for these.
    assert_eq!(plain.encode(&5usize), [0x05]);
    assert_eq!(plain.encode(&-40isize), [0xd0, 0xd8]);
}

#[test]
fn floats() {
    let plain = Encoder::new();
    let mut expected = vec![0xcb];
    expected.extend_from_slice(&1.5f64.to_be_bytes());
    assert_eq!(plain.encode(&1.5f64), expected);
    assert_eq!(plain.encode(&0.5f32), [0xca, 0x3f, 0x00, 0x00, 0x00]);
    assert_eq!(plain.encode(&3.0f64)[0], 0xcb);

    let compact = Encoder::new().compact_floats(true);
    assert_eq!(compact.encode(&3.0f64), [0x03]);
    assert_eq!(compact.encode(&-1.0f64), [0xff]);
    assert_eq!(compact.encode(&2.0f32), [0x02]);
    assert_eq!(compact.encode(&1e10f64), [0xcf, 0, 0, 0, 0x02, 0x54, 0x0b, 0xe4, 0x00]);
    assert_eq!(compact.encode(&0.5f32)[0], 0xca);
    assert_eq!(compact.encode(&f64::NAN)[0], 0xcb);
    assert_eq!(compact.encode(&f64::INFINITY)[0], 0xcb);
    assert_eq!(compact.encode(&9_223_372_036_854_775_808.0f64)[0], 0xcb);
    assert_eq!(compact.encode(&-9_223_372_036_854_775_808.0f64)[0], 0xd3);
}

#[test]
fn string_classes() {
    let cases: &[(usize, &[u8])] = &[
        (0, &[0xa0]),
        (31, &[0xbf]),
        (32, &[0xd9, 32]),
        (255, &[0xd9, 0xff]),
        (256, &[0xda, 0x01, 0x00]),
        (65_535, &[0xda, 0xff, 0xff]),
        (65_536, &[0xdb, 0x00, 0x01, 0x00, 0x00]),
    ];
    for (len, header) in cases {
        let s = "x".repeat(*len);
        let buf = Encoder::new().encode(s.as_str());
        assert_eq!(&buf[..header.len()], *header, "len {len}");
        assert_eq!(buf.len(), header.len() + len);
    }
}

#[test]
fn binary_has_no_inline_form() {
    let enc = Encoder::new();
    assert_eq!(bytes_of(|e, b| e.append_bytes(b, None)), [0xc0]);
    assert_eq!(enc.encode(&Vec::<u8>::new()), [0xc4, 0x00]);
    assert_eq!(enc.encode(&[1u8, 2][..]), [0xc4, 0x02, 0x01, 0x02]);
    assert_eq!(&enc.encode(&vec![0u8; 256])[..3], &[0xc5, 0x01, 0x00]);
    assert_eq!(&enc.encode(&vec![0u8; 65_536])[..5], &[0xc6, 0x00, 0x01, 0x00, 0x00]);
}

#[test]
fn collection_headers() {
    let lens: &[(usize, &[u8], &[u8])] = &[
        (0, &[0x90], &[0x80]),
        (15, &[0x9f], &[0x8f]),
        (16, &[0xdc, 0x00, 0x10], &[0xde, 0x00, 0x10]),
        (65_535, &[0xdc, 0xff, 0xff], &[0xde, 0xff, 0xff]),
        (
            65_536,
            &[0xdd, 0x00, 0x01, 0x00, 0x00],
            &[0xdf, 0x00, 0x01, 0x00, 0x00],
        ),
    ];
    for (len, array, map) in lens {
        assert_eq!(&bytes_of(|e, b| e.append_array_len(b, *len)), array);
        assert_eq!(&bytes_of(|e, b| e.append_map_len(b, *len)), map);
    }
}

#[test]
fn absent_collections_are_nil() {
    let enc = Encoder::new();
    let mut buf = Vec::new();
    enc.append_str_array::<String>(&mut buf, None);
    enc.append_array::<Value>(&mut buf, None);
    enc.append(&mut buf, &None::<Vec<String>>);
    assert_eq!(buf, [0xc0, 0xc0, 0xc0]);

    let mut buf = Vec::new();
    enc.append_str_array(&mut buf, Some(&["a", "bc"][..]));
    assert_eq!(buf, [0x92, 0xa1, b'a', 0xa2, b'b', b'c']);
}

#[test]
fn sorted_map_keys() {
    let mut ba = IndexMap::new();
    ba.insert("b", 1u8);
    ba.insert("a", 2u8);
    let mut ab = IndexMap::new();
    ab.insert("a", 2u8);
    ab.insert("b", 1u8);

    let sorted = Encoder::new().sort_map_keys(true);
    let expected = [0x82, 0xa1, b'a', 0xcc, 0x02, 0xa1, b'b', 0xcc, 0x01];
    assert_eq!(sorted.encode(&ba), expected);
    assert_eq!(sorted.encode(&ab), expected);

    let plain = Encoder::new();
    assert_eq!(plain.encode(&ab), expected);
    assert_eq!(
        plain.encode(&ba),
        [0x82, 0xa1, b'b', 0xcc, 0x01, 0xa1, b'a', 0xcc, 0x02]
    );
}

#[test]
fn sorted_keys_compare_bytes() {
    let mut map = BTreeMap::new();
    map.insert("é".to_string(), Value::Nil);
    map.insert("z".to_string(), Value::Nil);
    map.insert("Z".to_string(), Value::Nil);
    let buf = Encoder::new().sort_map_keys(true).encode(&map);
    assert_eq!(
        buf,
        [0x83, 0xa1, b'Z', 0xc0, 0xa1, b'z', 0xc0, 0xa2, 0xc3, 0xa9, 0xc0]
    );
}

#[test]
fn ext_headers() {
    let cases: &[(usize, &[u8])] = &[
        (1, &[0xd4, 0x07]),
        (2, &[0xd5, 0x07]),
        (4, &[0xd6, 0x07]),
        (8, &[0xd7, 0x07]),
        (16, &[0xd8, 0x07]),
        (0, &[0xc7, 0x00, 0x07]),
        (3, &[0xc7, 0x03, 0x07]),
        (256, &[0xc8, 0x01, 0x00, 0x07]),
        (70_000, &[0xc9, 0x00, 0x01, 0x11, 0x70, 0x07]),
    ];
    for (len, expected) in cases {
        assert_eq!(&bytes_of(|e, b| e.append_ext_header(b, 7, *len)), expected, "{len}");
    }
    assert_eq!(bytes_of(|e, b| e.append_ext(b, -2, &[9])), [0xd4, 0xfe, 0x09]);
}

#[test]
fn multi_and_values() {
    let enc = Encoder::new();
    let mut buf = Vec::new();
    enc.append_multi(&mut buf, &[&true, &"a", &Value::Nil, &7u8]);
    assert_eq!(buf, [0xc3, 0xa1, b'a', 0xc0, 0xcc, 0x07]);

    let mut any = IndexMap::new();
    any.insert(Value::I8(1), Value::from("x"));
    let mut buf = Vec::new();
    enc.append_value(&mut buf, &Value::AnyMap(any));
    assert_eq!(buf, [0x81, 0xd0, 0x01, 0xa1, b'x']);

    let ext = Value::Ext {
        type_id: 3,
        data: vec![1, 2].into(),
    };
    assert_eq!(enc.encode(&ext), [0xd5, 0x03, 0x01, 0x02]);
}

#[test]
fn durations_are_nanoseconds() {
    let plain = Encoder::new();
    let mut expected = vec![0xd3];
    expected.extend_from_slice(&1_000_000_000i64.to_be_bytes());
    assert_eq!(plain.encode(&Duration::from_secs(1)), expected);

    let compact = Encoder::new().compact_ints(true);
    assert_eq!(
        compact.encode(&Duration::from_secs(1)),
        [0xce, 0x3b, 0x9a, 0xca, 0x00]
    );
    assert_eq!(compact.encode(&chrono::TimeDelta::nanoseconds(-5)), [0xfb]);
    assert_eq!(
        compact.encode(&Duration::MAX),
        [0xcf, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn append_extends_existing_buffer() {
    let mut buf = vec![0xaa];
    msgpack_wire::append(&mut buf, &1u8);
    assert_eq!(buf, [0xaa, 0xcc, 0x01]);
    assert_eq!(msgpack_wire::encode("hi"), [0xa2, b'h', b'i']);

    struct Pair(u8, u8);
    impl Encode for Pair {
        fn encode(&self, enc: &Encoder, dst: &mut Vec<u8>) {
            enc.append_array_len(dst, 2);
            enc.append_uint(dst, self.0 as u64);
            enc.append_uint(dst, self.1 as u64);
        }
    }
    assert_eq!(msgpack_wire::encode(&Pair(1, 2)), [0x92, 0x01, 0x02]);
}
