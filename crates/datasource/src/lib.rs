//! Deterministic decoding of fuzzer-supplied byte buffers.
//!
//! Every typed field the engine derives from an input buffer comes through
//! [`Datasource`]: a cursor over a byte slice that hands out fixed-width
//! integers, booleans and length-prefixed byte strings. Decoding is fully
//! deterministic: the same bytes always yield the same values, which is what
//! makes a differential run reproducible from its input alone.
//!
//! Exhausting the buffer is not a bug; it is the normal way a run ends. It
//! surfaces as [`OutOfData`], which callers propagate with `?` and the
//! engine treats as "no more operations this run".
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to
//! ensure all error paths are handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

use alloc::vec::Vec;
use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// OutOfData
// ─────────────────────────────────────────────────────────────────────────────

/// The byte stream ran out before the requested value could be decoded.
///
/// Intentionally field-free: there is nothing to recover, and the only
/// meaningful reaction is to stop deriving values from this input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct OutOfData;

impl OutOfData {
  /// Create a new out-of-data error.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self
  }
}

impl Default for OutOfData {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for OutOfData {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("byte stream exhausted")
  }
}

impl core::error::Error for OutOfData {}

// ─────────────────────────────────────────────────────────────────────────────
// Datasource
// ─────────────────────────────────────────────────────────────────────────────

/// A deterministic cursor over a fuzzer input buffer.
///
/// Integers are decoded little-endian. Byte strings are length-prefixed by a
/// little-endian `u32`; the prefix may not promise more bytes than the
/// buffer still holds.
///
/// # Example
///
/// ```
/// use datasource::Datasource;
///
/// let mut ds = Datasource::new(&[0x2a, 0x01, 0x03, 0x00, 0x00, 0x00, b'a', b'b', b'c']);
/// assert_eq!(ds.get_u8()?, 0x2a);
/// assert!(ds.get_bool()?);
/// assert_eq!(ds.get_data(0)?, b"abc");
/// assert!(ds.get_u8().is_err());
/// # Ok::<(), datasource::OutOfData>(())
/// ```
#[derive(Debug, Clone)]
pub struct Datasource<'a> {
  data: &'a [u8],
  pos: usize,
}

impl<'a> Datasource<'a> {
  /// Create a cursor over `data`, positioned at the start.
  #[inline]
  #[must_use]
  pub const fn new(data: &'a [u8]) -> Self {
    Self { data, pos: 0 }
  }

  /// Bytes not yet consumed.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> usize {
    self.data.len() - self.pos
  }

  /// Take the next `n` raw bytes.
  #[inline]
  pub fn get_bytes(&mut self, n: usize) -> Result<&'a [u8], OutOfData> {
    let end = self.pos.checked_add(n).ok_or(OutOfData)?;
    let out = self.data.get(self.pos..end).ok_or(OutOfData)?;
    self.pos = end;
    Ok(out)
  }

  /// Decode one byte.
  #[inline]
  pub fn get_u8(&mut self) -> Result<u8, OutOfData> {
    let bytes = self.get_bytes(1)?;
    bytes.first().copied().ok_or(OutOfData)
  }

  /// Decode a little-endian `u16`.
  #[inline]
  pub fn get_u16(&mut self) -> Result<u16, OutOfData> {
    let bytes = self.get_bytes(2)?;
    let arr: [u8; 2] = bytes.try_into().map_err(|_| OutOfData)?;
    Ok(u16::from_le_bytes(arr))
  }

  /// Decode a little-endian `u32`.
  #[inline]
  pub fn get_u32(&mut self) -> Result<u32, OutOfData> {
    let bytes = self.get_bytes(4)?;
    let arr: [u8; 4] = bytes.try_into().map_err(|_| OutOfData)?;
    Ok(u32::from_le_bytes(arr))
  }

  /// Decode a little-endian `u64`.
  #[inline]
  pub fn get_u64(&mut self) -> Result<u64, OutOfData> {
    let bytes = self.get_bytes(8)?;
    let arr: [u8; 8] = bytes.try_into().map_err(|_| OutOfData)?;
    Ok(u64::from_le_bytes(arr))
  }

  /// Decode a boolean from the low bit of the next byte.
  #[inline]
  pub fn get_bool(&mut self) -> Result<bool, OutOfData> {
    Ok(self.get_u8()? & 1 == 1)
  }

  /// Decode a length-prefixed byte string of at least `min` bytes.
  ///
  /// The `u32` prefix may not exceed the bytes still available, and the
  /// decoded string may not be shorter than `min`.
  pub fn get_data(&mut self, min: usize) -> Result<Vec<u8>, OutOfData> {
    let len = self.get_u32()? as usize;
    if len < min || len > self.remaining() {
      return Err(OutOfData);
    }
    Ok(self.get_bytes(len)?.to_vec())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
