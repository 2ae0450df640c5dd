//! Byte cursor for the persisted score format.
//!
//! This module provides `ByteReader`, a position-tracking reader over an
//! encoded score blob, plus the big-endian integer write helper used by the
//! category codecs. Every ruleset decode ends with [`ByteReader::finish`]
//! so that blobs with unconsumed trailing bytes are rejected.

use crate::error::CodecError;

/// A position-tracking reader over an encoded score blob.
///
/// Wraps a byte slice and maintains a current position, allowing sequential
/// reads of the fixed-width fields the score formats are built from.
///
/// # Example
///
/// ```
/// use tally_core::codec::ByteReader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut r = ByteReader::new(&data);
///
/// assert_eq!(r.read_u8().unwrap(), 0x01);
/// assert_eq!(r.read_uint_be(2).unwrap(), 0x0203);
/// assert!(r.finish().is_ok());
/// ```
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Reads the specified number of bytes and advances the position.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos.checked_add(count).ok_or(CodecError::UnexpectedEnd {
            offset: self.pos,
            needed: count,
        })?;

        if end > self.data.len() {
            return Err(CodecError::UnexpectedEnd {
                offset: self.pos,
                needed: end - self.data.len(),
            });
        }

        let result = &self.data[self.pos..end];
        self.pos = end;
        Ok(result)
    }

    /// Reads a single byte and advances the position.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a big-endian unsigned integer of `len` bytes (1..=8).
    pub fn read_uint_be(&mut self, len: usize) -> Result<u64, CodecError> {
        let bytes = self.read_bytes(len)?;
        let mut value = 0u64;
        for &b in bytes {
            value = (value << 8) | u64::from(b);
        }
        Ok(value)
    }

    /// Reads a big-endian integer of `len` bytes, sign-extending when
    /// `signed` is set.
    pub fn read_int_be(&mut self, len: usize, signed: bool) -> Result<i64, CodecError> {
        let raw = self.read_uint_be(len)?;
        if signed && len < 8 {
            let shift = 64 - 8 * len as u32;
            Ok(((raw << shift) as i64) >> shift)
        } else {
            Ok(raw as i64)
        }
    }

    /// Fails if any bytes remain unread.
    ///
    /// The score formats declare their exact layout up front, so a blob
    /// with trailing data was not produced by the matching encoder.
    pub fn finish(&self) -> Result<(), CodecError> {
        let remaining = self.remaining();
        if remaining > 0 {
            return Err(CodecError::TrailingBytes { remaining });
        }
        Ok(())
    }
}

/// Appends `value` to `dest` as a big-endian integer of `len` bytes.
///
/// Fails with [`CodecError::ValueTooWide`] if the value does not fit the
/// fixed width (two's complement range when `signed`).
pub fn write_int_be(
    dest: &mut Vec<u8>,
    value: i64,
    len: usize,
    signed: bool,
) -> Result<(), CodecError> {
    if !int_fits(value, len, signed) {
        return Err(CodecError::ValueTooWide { value, len });
    }
    let bytes = value.to_be_bytes();
    dest.extend_from_slice(&bytes[8 - len..]);
    Ok(())
}

/// Whether `value` is representable in `len` bytes.
pub fn int_fits(value: i64, len: usize, signed: bool) -> bool {
    if len >= 8 {
        return signed || value >= 0;
    }
    let bits = 8 * len as u32;
    if signed {
        let max = (1i64 << (bits - 1)) - 1;
        let min = -(1i64 << (bits - 1));
        (min..=max).contains(&value)
    } else {
        (0..(1i64 << bits)).contains(&value)
    }
}
