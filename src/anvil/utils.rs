//! Low-level byte reading utilities

use byteorder::{BigEndian, ByteOrder};

use crate::anvil::types::error::{AnvilError, Result};

/// A forward-only big-endian reader over a borrowed byte slice.
///
/// Every read either consumes exactly the bytes it needs or fails with
/// [`AnvilError::UnexpectedEnd`] without moving the cursor.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrows the next `n` bytes and advances past them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(AnvilError::UnexpectedEnd {
                offset: self.pos,
                needed: n,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Checks that `count` elements of `width` bytes each are available.
    ///
    /// Used before allocating storage for a length-prefixed payload.
    pub fn ensure(&self, count: usize, width: usize) -> Result<usize> {
        let needed = count.checked_mul(width).ok_or(AnvilError::UnexpectedEnd {
            offset: self.pos,
            needed: usize::MAX,
        })?;
        if needed > self.remaining() {
            return Err(AnvilError::UnexpectedEnd {
                offset: self.pos,
                needed,
            });
        }
        Ok(needed)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }
}

/// Reads a 3-byte big-endian unsigned number.
///
/// Used for the sector offset half of a region directory entry.
pub fn read_u24(bytes: &[u8]) -> u32 {
    BigEndian::read_u24(bytes)
}
