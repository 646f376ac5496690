//! Byte strings, decimal bignums, and nondeterminism modifiers.

use alloc::{string::String, vec::Vec};
use core::fmt;

use datasource::{Datasource, OutOfData};

// ─────────────────────────────────────────────────────────────────────────────
// Buffer
// ─────────────────────────────────────────────────────────────────────────────

/// An owned byte string decoded from the input stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Buffer(Vec<u8>);

impl Buffer {
  /// Wrap an owned byte vector.
  #[inline]
  #[must_use]
  pub const fn new(bytes: Vec<u8>) -> Self {
    Self(bytes)
  }

  /// Decode a length-prefixed byte string from the stream.
  #[inline]
  pub fn read(ds: &mut Datasource<'_>) -> Result<Self, OutOfData> {
    Ok(Self(ds.get_data(0)?))
  }

  /// The raw bytes.
  #[inline]
  #[must_use]
  pub fn as_slice(&self) -> &[u8] {
    &self.0
  }

  /// Length in bytes.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Whether the buffer is empty.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Lowercase hex rendering, used for pool keys and diagnostics.
  #[must_use]
  pub fn to_hex(&self) -> String {
    let mut out = String::with_capacity(self.0.len() * 2);
    for b in &self.0 {
      // Writing into a String cannot fail.
      let _ = fmt::Write::write_fmt(&mut out, format_args!("{b:02x}"));
    }
    out
  }
}

impl From<&[u8]> for Buffer {
  #[inline]
  fn from(bytes: &[u8]) -> Self {
    Self(bytes.to_vec())
  }
}

impl From<Vec<u8>> for Buffer {
  #[inline]
  fn from(bytes: Vec<u8>) -> Self {
    Self(bytes)
  }
}

impl fmt::Display for Buffer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{{} bytes}} {}", self.len(), self.to_hex())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bignum
// ─────────────────────────────────────────────────────────────────────────────

/// An arbitrary-precision integer carried as its ASCII-decimal string.
///
/// The engine never computes with bignums; backends do. The engine only
/// sizes them (guards), normalizes them (pool keys), and compares them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bignum(String);

impl Bignum {
  /// Wrap a decimal string. Non-digit characters are the caller's problem;
  /// [`Bignum::read`] never produces them.
  #[inline]
  #[must_use]
  pub const fn new(s: String) -> Self {
    Self(s)
  }

  /// Decode a bignum from the stream, keeping only ASCII decimal digits.
  pub fn read(ds: &mut Datasource<'_>) -> Result<Self, OutOfData> {
    let raw = ds.get_data(0)?;
    let digits: String = raw.into_iter().filter(u8::is_ascii_digit).map(char::from).collect();
    Ok(Self(digits))
  }

  /// The raw decimal string as decoded, leading zeros included.
  #[inline]
  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Length of the raw decimal string. Guards cap on this, not on the
  /// trimmed form.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Whether the raw string is empty.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Canonical form: leading zeros stripped, empty and all-zero both
  /// normalize to `"0"`. Pool keys and result comparisons use this.
  #[must_use]
  pub fn to_trimmed_string(&self) -> String {
    let trimmed = self.0.trim_start_matches('0');
    if trimmed.is_empty() {
      String::from("0")
    } else {
      String::from(trimmed)
    }
  }
}

impl From<&str> for Bignum {
  #[inline]
  fn from(s: &str) -> Self {
    Self(String::from(s))
  }
}

impl fmt::Display for Bignum {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_trimmed_string())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Modifier
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque byte string seeding backend-internal nondeterministic choices
/// (nonce derivation and the like). Backends interpret it; the engine only
/// perturbs it to keep adjacent identical dispatches apart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifier(Vec<u8>);

impl Modifier {
  /// Wrap modifier bytes.
  #[inline]
  #[must_use]
  pub const fn new(bytes: Vec<u8>) -> Self {
    Self(bytes)
  }

  /// The empty modifier.
  #[inline]
  #[must_use]
  pub const fn empty() -> Self {
    Self(Vec::new())
  }

  /// The raw bytes.
  #[inline]
  #[must_use]
  pub fn as_slice(&self) -> &[u8] {
    &self.0
  }

  /// Whether the modifier is empty.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Make this modifier differ from its previous value: an empty modifier
  /// becomes 512 bytes of `0x01`; otherwise every byte is incremented with
  /// wrap-around.
  pub fn perturb(&mut self) {
    if self.0.is_empty() {
      self.0 = alloc::vec![1u8; 512];
    } else {
      for b in &mut self.0 {
        *b = b.wrapping_add(1);
      }
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// SymmetricCipher
// ─────────────────────────────────────────────────────────────────────────────

/// Cipher selector plus its key material, shared by MAC and cipher ops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymmetricCipher {
  pub iv: Buffer,
  pub key: Buffer,
  pub cipher_type: crate::ids::CipherKind,
}

impl SymmetricCipher {
  /// Decode `iv`, `key`, and the cipher ID from the stream.
  pub fn read(ds: &mut Datasource<'_>) -> Result<Self, OutOfData> {
    Ok(Self {
      iv: Buffer::read(ds)?,
      key: Buffer::read(ds)?,
      cipher_type: crate::ids::CipherKind::from_id(ds.get_u64()?),
    })
  }
}

impl fmt::Display for SymmetricCipher {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "cipher: {}", self.cipher_type)?;
    writeln!(f, "key: {}", self.key)?;
    write!(f, "iv: {}", self.iv)
  }
}
