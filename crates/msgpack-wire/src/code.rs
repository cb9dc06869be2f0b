//! MessagePack format codes.
//!
//! Every value on the wire starts with one of these bytes. The fixed forms
//! pack a small value or length into the low bits of the code itself.

pub const POS_FIXED_NUM_HIGH: u8 = 0x7f;
pub const NEG_FIXED_NUM_LOW: u8 = 0xe0;

pub const NIL: u8 = 0xc0;

pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const FLOAT: u8 = 0xca;
pub const DOUBLE: u8 = 0xcb;

pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;

pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;

pub const FIXED_STR_LOW: u8 = 0xa0;
pub const FIXED_STR_HIGH: u8 = 0xbf;
pub const FIXED_STR_MASK: u8 = 0x1f;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;

pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;

pub const FIXED_ARRAY_LOW: u8 = 0x90;
pub const FIXED_ARRAY_HIGH: u8 = 0x9f;
pub const FIXED_ARRAY_MASK: u8 = 0x0f;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;

pub const FIXED_MAP_LOW: u8 = 0x80;
pub const FIXED_MAP_HIGH: u8 = 0x8f;
pub const FIXED_MAP_MASK: u8 = 0x0f;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

pub const FIX_EXT1: u8 = 0xd4;
pub const FIX_EXT2: u8 = 0xd5;
pub const FIX_EXT4: u8 = 0xd6;
pub const FIX_EXT8: u8 = 0xd7;
pub const FIX_EXT16: u8 = 0xd8;
pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;

/// Positive or negative fixint.
#[inline]
pub fn is_fixed_num(c: u8) -> bool {
    c <= POS_FIXED_NUM_HIGH || c >= NEG_FIXED_NUM_LOW
}

#[inline]
pub fn is_fixed_map(c: u8) -> bool {
    (FIXED_MAP_LOW..=FIXED_MAP_HIGH).contains(&c)
}

#[inline]
pub fn is_fixed_array(c: u8) -> bool {
    (FIXED_ARRAY_LOW..=FIXED_ARRAY_HIGH).contains(&c)
}

#[inline]
pub fn is_fixed_string(c: u8) -> bool {
    (FIXED_STR_LOW..=FIXED_STR_HIGH).contains(&c)
}

/// Any string code: fixstr or str8/16/32.
#[inline]
pub fn is_string(c: u8) -> bool {
    is_fixed_string(c) || (STR8..=STR32).contains(&c)
}

#[inline]
pub fn is_bin(c: u8) -> bool {
    (BIN8..=BIN32).contains(&c)
}

/// Any extension code: fixext1..16 or ext8/16/32.
#[inline]
pub fn is_ext(c: u8) -> bool {
    (FIX_EXT1..=FIX_EXT16).contains(&c) || (EXT8..=EXT32).contains(&c)
}

#[inline]
pub fn is_map(c: u8) -> bool {
    is_fixed_map(c) || c == MAP16 || c == MAP32
}

#[inline]
pub fn is_array(c: u8) -> bool {
    is_fixed_array(c) || c == ARRAY16 || c == ARRAY32
}
