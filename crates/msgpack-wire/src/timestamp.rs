//! Timestamp extension (type -1).
//!
//! Wire forms, chosen by the encoder from the value:
//!
//! | body     | layout                          | used when                       |
//! |----------|---------------------------------|---------------------------------|
//! | 4 bytes  | `u32` seconds                   | no nanoseconds, seconds < 2^32  |
//! | 8 bytes  | `nanos << 34 \| seconds`         | seconds < 2^34                  |
//! | 12 bytes | `u32` nanos, then `i64` seconds | everything else                 |
//!
//! The decoder also accepts ext id 13, a two-element `[seconds, nanos]`
//! array and an RFC 3339 string.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, TimeZone, Utc};
use msgpack_buffers::Reader;

use crate::code;
use crate::error::{Error, Result};
use crate::{Decoder, Encoder};

/// Extension type id for timestamps.
pub const EXT_ID: i8 = -1;

/// Alternate id some encoders write for timestamps.
pub const ALT_EXT_ID: i8 = 13;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A point in time as seconds and nanoseconds since the Unix epoch.
///
/// There is no zone: every timestamp is a UTC instant. `nanos` is always
/// below one second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

impl Timestamp {
    pub const UNIX_EPOCH: Timestamp = Timestamp { secs: 0, nanos: 0 };

    /// Builds a timestamp, carrying nanoseconds outside `[0, 1e9)` into the
    /// seconds.
    pub fn new(secs: i64, nanos: i64) -> Self {
        let carry = nanos.div_euclid(NANOS_PER_SEC);
        Timestamp {
            secs: secs.saturating_add(carry),
            nanos: nanos.rem_euclid(NANOS_PER_SEC) as u32,
        }
    }

    pub fn now() -> Self {
        Timestamp::from(SystemTime::now())
    }

    pub fn secs(&self) -> i64 {
        self.secs
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    pub fn is_unix_epoch(&self) -> bool {
        *self == Self::UNIX_EPOCH
    }

    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp(self.secs, self.nanos).ok_or(Error::TimestampOutOfRange {
            secs: self.secs,
            nanos: self.nanos,
        })
    }

    pub fn to_system_time(&self) -> Result<SystemTime> {
        let out_of_range = Error::TimestampOutOfRange {
            secs: self.secs,
            nanos: self.nanos,
        };
        let base = if self.secs >= 0 {
            UNIX_EPOCH.checked_add(Duration::from_secs(self.secs as u64))
        } else {
            UNIX_EPOCH.checked_sub(Duration::from_secs(self.secs.unsigned_abs()))
        };
        base.and_then(|t| t.checked_add(Duration::from_nanos(self.nanos as u64)))
            .ok_or(out_of_range)
    }

    /// Parses an RFC 3339 date-time with any offset.
    pub fn parse_rfc3339(s: &str) -> Result<Self> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Timestamp::from(&dt))
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for Timestamp {
    fn from(dt: &DateTime<Tz>) -> Self {
        // Leap seconds show up as nanos >= 1e9.
        Timestamp::new(dt.timestamp(), dt.timestamp_subsec_nanos() as i64)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Timestamp::from(&dt)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => Timestamp::new(
                i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
                d.subsec_nanos() as i64,
            ),
            Err(before) => {
                let d = before.duration();
                Timestamp::new(
                    i64::try_from(d.as_secs()).map_or(i64::MIN, |s| -s),
                    -(d.subsec_nanos() as i64),
                )
            }
        }
    }
}

impl Encoder {
    /// Appends a timestamp extension in its shortest form.
    pub fn append_time(&self, dst: &mut Vec<u8>, ts: Timestamp) {
        let secs = ts.secs as u64;
        if secs >> 34 == 0 {
            let data = (ts.nanos as u64) << 34 | secs;
            if data & 0xffff_ffff_0000_0000 == 0 {
                self.append_ext_header(dst, EXT_ID, 4);
                dst.extend_from_slice(&(data as u32).to_be_bytes());
            } else {
                self.append_ext_header(dst, EXT_ID, 8);
                dst.extend_from_slice(&data.to_be_bytes());
            }
            return;
        }
        self.append_ext_header(dst, EXT_ID, 12);
        dst.extend_from_slice(&ts.nanos.to_be_bytes());
        dst.extend_from_slice(&ts.secs.to_be_bytes());
    }
}

impl<'a> Decoder<'a> {
    /// Decodes a timestamp in any of the accepted forms.
    pub fn decode_time(&mut self) -> Result<Timestamp> {
        self.atomic(|d| {
            let c = d.read_tag()?;
            if c == code::FIXED_ARRAY_LOW | 2 {
                let secs = d.decode_int()?;
                let nanos = d.decode_int()?;
                return Ok(Timestamp::new(secs, nanos));
            }
            if code::is_string(c) {
                let s = d.str_with_tag(c)?;
                return Timestamp::parse_rfc3339(&s);
            }
            let (type_id, len) = d.ext_header(c)?;
            if type_id != EXT_ID && type_id != ALT_EXT_ID {
                return Err(Error::InvalidExtId(type_id));
            }
            d.time_body(len)
        })
    }

    /// Reads a timestamp body of `len` bytes, the ext header already consumed.
    pub(crate) fn time_body(&mut self, len: usize) -> Result<Timestamp> {
        let mut body = Reader::new(self.read_n(len)?);
        match len {
            4 => Ok(Timestamp::new(body.u32()? as i64, 0)),
            8 => {
                let data = body.u64()?;
                Ok(Timestamp::new(
                    (data & 0x0000_0003_ffff_ffff) as i64,
                    (data >> 34) as i64,
                ))
            }
            12 => {
                let nanos = body.u32()?;
                let secs = body.i64()?;
                Ok(Timestamp::new(secs, nanos as i64))
            }
            _ => Err(Error::InvalidExtLen(len)),
        }
    }
}
