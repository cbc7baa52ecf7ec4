//! Little-endian cursor primitives for the binary formats.

use crate::error::{Error, InvalidValue, Result};

/// Size of the `u32` count header.
pub const COUNT_SIZE: usize = 4;
/// One point record: `f64 x, f64 y`.
pub const POINT_SIZE: usize = 16;
/// One triangle record: `u32 i0, u32 i1, u32 i2`.
pub const TRIANGLE_SIZE: usize = 12;

/// Bytes needed by a section of `count` records of `record` bytes, `None` on overflow.
#[inline]
pub(crate) fn section_len(count: usize, record: usize) -> Option<usize> {
    count.checked_mul(record)?.checked_add(COUNT_SIZE)
}

/// Forward-only reader over a borrowed buffer.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Fail with `TruncatedBuffer` unless `n` more bytes are available.
    pub fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::TruncatedBuffer {
                needed: self.pos.saturating_add(n),
                available: self.buf.len(),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.require(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        self.take::<8>().map(f64::from_le_bytes)
    }

    /// Reject bytes left over after a complete document.
    pub fn finish(&self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(Error::from(InvalidValue::CountMismatch {
                expected: self.pos,
                actual: self.buf.len(),
            }));
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

#[inline]
pub(crate) fn put_f64(out: &mut Vec<u8>, v: f64) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Count header value, or `CountOverflow` when it does not fit.
#[inline]
pub(crate) fn count_header(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| Error::from(InvalidValue::CountOverflow { count }))
}
