//! Digest and MAC operations.

use alloc::string::{String, ToString};

use datasource::{Datasource, OutOfData};
use serde_json::{json, Value};

use super::Operation;
use crate::{
  ids::DigestKind,
  primitive::{Buffer, Modifier, SymmetricCipher},
};

/// One-shot message digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Digest {
  pub modifier: Modifier,
  pub cleartext: Buffer,
  pub digest_type: DigestKind,
}

impl Operation for Digest {
  const NAME: &'static str = "Digest";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      cleartext: Buffer::read(ds)?,
      digest_type: DigestKind::from_id(ds.get_u64()?),
    })
  }

  fn modifier(&self) -> &Modifier {
    &self.modifier
  }

  fn modifier_mut(&mut self) -> &mut Modifier {
    &mut self.modifier
  }

  fn algorithm(&self) -> String {
    self.digest_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "digest": self.digest_type.to_string(),
      "cleartext": self.cleartext.to_hex(),
    })
  }
}

/// Keyed-hash message authentication code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hmac {
  pub modifier: Modifier,
  pub cleartext: Buffer,
  pub digest_type: DigestKind,
  pub cipher: SymmetricCipher,
}

impl Operation for Hmac {
  const NAME: &'static str = "HMAC";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      cleartext: Buffer::read(ds)?,
      digest_type: DigestKind::from_id(ds.get_u64()?),
      cipher: SymmetricCipher::read(ds)?,
    })
  }

  fn modifier(&self) -> &Modifier {
    &self.modifier
  }

  fn modifier_mut(&mut self) -> &mut Modifier {
    &mut self.modifier
  }

  fn algorithm(&self) -> String {
    self.digest_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "digest": self.digest_type.to_string(),
      "cleartext": self.cleartext.to_hex(),
      "key": self.cipher.key.to_hex(),
    })
  }
}

/// Cipher-based message authentication code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cmac {
  pub modifier: Modifier,
  pub cleartext: Buffer,
  pub cipher: SymmetricCipher,
}

impl Operation for Cmac {
  const NAME: &'static str = "CMAC";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      cleartext: Buffer::read(ds)?,
      cipher: SymmetricCipher::read(ds)?,
    })
  }

  fn modifier(&self) -> &Modifier {
    &self.modifier
  }

  fn modifier_mut(&mut self) -> &mut Modifier {
    &mut self.modifier
  }

  fn algorithm(&self) -> String {
    self.cipher.cipher_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "cipher": self.cipher.cipher_type.to_string(),
      "cleartext": self.cleartext.to_hex(),
      "key": self.cipher.key.to_hex(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ids::CipherKind, ops::tests::chunk};

  #[test]
  fn digest_read_consumes_cleartext_then_id() {
    let mut input = chunk(b"hello");
    input.extend(DigestKind::SHA256.id().to_le_bytes());
    let mut ds = Datasource::new(&input);

    let op = Digest::read(&mut ds, Modifier::empty()).unwrap();
    assert_eq!(op.cleartext.as_slice(), b"hello");
    assert_eq!(op.digest_type, DigestKind::SHA256);
    assert_eq!(op.algorithm(), "SHA-256");
    assert_eq!(ds.remaining(), 0);
  }

  #[test]
  fn digest_read_propagates_underrun() {
    let input = chunk(b"hello");
    let mut ds = Datasource::new(&input);
    assert!(Digest::read(&mut ds, Modifier::empty()).is_err());
  }

  #[test]
  fn cmac_algorithm_is_the_cipher() {
    let mut input = chunk(b"msg");
    input.extend(chunk(&[0u8; 8]));
    input.extend(chunk(&[1u8; 16]));
    input.extend(CipherKind::AES_128_CBC.id().to_le_bytes());
    let mut ds = Datasource::new(&input);

    let op = Cmac::read(&mut ds, Modifier::empty()).unwrap();
    assert_eq!(op.algorithm(), "AES_128_CBC");
  }

  #[test]
  fn hmac_json_carries_key() {
    let mut input = chunk(b"m");
    input.extend(DigestKind::SHA1.id().to_le_bytes());
    input.extend(chunk(&[]));
    input.extend(chunk(&[0xaa; 2]));
    input.extend(DigestKind::SHA1.id().to_le_bytes());
    let mut ds = Datasource::new(&input);

    let op = Hmac::read(&mut ds, Modifier::empty()).unwrap();
    assert_eq!(op.to_json()["key"], json!("aaaa"));
  }
}
