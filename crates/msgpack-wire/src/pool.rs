//! Reusable decoders.
//!
//! A [`DecoderPool`] hands out decoders bound to a caller's buffer. When the
//! guard drops, the decoder goes back to the pool fully reset: no buffer, the
//! cursor at zero, both flags off and no map strategy.

use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

use crate::Decoder;

#[derive(Debug, Default)]
pub struct DecoderPool {
    idle: Mutex<Vec<Decoder<'static>>>,
}

impl DecoderPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a decoder from the pool, or makes one, positioned at the start
    /// of `data`.
    pub fn get<'a>(&self, data: &'a [u8]) -> PooledDecoder<'_, 'a> {
        let mut dec: Decoder<'a> = self.idle.lock().pop().unwrap_or_default();
        dec.reset(data);
        PooledDecoder { pool: self, dec }
    }

    /// Number of decoders waiting to be reused.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    fn put(&self, dec: Decoder<'_>) {
        tracing::debug!(
            position = dec.position(),
            loose = dec.is_loose(),
            zero_copy = dec.is_zero_copy(),
            "resetting pooled decoder"
        );
        // A fresh decoder drops the buffer borrow and every setting.
        drop(dec);
        self.idle.lock().push(Decoder::default());
    }
}

/// A decoder on loan from a [`DecoderPool`].
#[derive(Debug)]
pub struct PooledDecoder<'p, 'a> {
    pool: &'p DecoderPool,
    dec: Decoder<'a>,
}

impl<'a> Deref for PooledDecoder<'_, 'a> {
    type Target = Decoder<'a>;

    fn deref(&self) -> &Self::Target {
        &self.dec
    }
}

impl DerefMut for PooledDecoder<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.dec
    }
}

impl Drop for PooledDecoder<'_, '_> {
    fn drop(&mut self) {
        let dec = std::mem::take(&mut self.dec);
        self.pool.put(dec);
    }
}
