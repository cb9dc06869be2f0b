//! Skipping values without building them.

use crate::code;
use crate::error::{Error, Result};
use crate::Decoder;

impl<'a> Decoder<'a> {
    /// Moves the cursor past the next complete value, descending into
    /// arrays and maps up to [`MAX_DEPTH`](crate::MAX_DEPTH) levels. Nothing
    /// is allocated.
    pub fn skip(&mut self) -> Result<()> {
        self.atomic(|d| d.skip_value())
    }

    fn skip_value(&mut self) -> Result<()> {
        let c = self.read_tag()?;
        if code::is_fixed_num(c) {
            return Ok(());
        }
        if code::is_map(c) {
            let n = self.map_len(c)?.unwrap_or(0);
            return self.nested(|d| {
                for _ in 0..n {
                    d.skip_value()?;
                    d.skip_value()?;
                }
                Ok(())
            });
        }
        if code::is_array(c) {
            let n = self.array_len(c)?.unwrap_or(0);
            return self.nested(|d| {
                for _ in 0..n {
                    d.skip_value()?;
                }
                Ok(())
            });
        }
        if code::is_string(c) || code::is_bin(c) {
            let n = self.bytes_len(c)?.unwrap_or(0);
            return self.skip_n(n);
        }
        if code::is_ext(c) {
            // Type byte plus body.
            let n = self.ext_len(c)?;
            return self.skip_n(n + 1);
        }
        match c {
            code::NIL | code::FALSE | code::TRUE => Ok(()),
            code::UINT8 | code::INT8 => self.skip_n(1),
            code::UINT16 | code::INT16 => self.skip_n(2),
            code::UINT32 | code::INT32 | code::FLOAT => self.skip_n(4),
            code::UINT64 | code::INT64 | code::DOUBLE => self.skip_n(8),
            _ => Err(Error::unexpected(c, "value")),
        }
    }
}
