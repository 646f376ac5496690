//! Symmetric encryption and decryption operations.

use alloc::string::{String, ToString};

use datasource::{Datasource, OutOfData};
use serde_json::{json, Value};

use super::{Operation, MAX_OUTPUT_SIZE};
use crate::{
  primitive::{Buffer, Modifier, SymmetricCipher},
  results::Ciphertext,
};

/// Symmetric (optionally authenticated) encryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymmetricEncrypt {
  pub modifier: Modifier,
  pub cleartext: Buffer,
  pub cipher: SymmetricCipher,
  pub aad: Option<Buffer>,
  /// Size of the output buffer the backend must respect.
  pub ciphertext_size: u64,
  /// Requested authentication-tag size; `None` for tagless operation.
  pub tag_size: Option<u64>,
}

impl Operation for SymmetricEncrypt {
  const NAME: &'static str = "SymmetricEncrypt";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    let cleartext = Buffer::read(ds)?;
    let cipher = SymmetricCipher::read(ds)?;
    let aad = if ds.get_bool()? { Some(Buffer::read(ds)?) } else { None };
    let ciphertext_size = ds.get_u64()? % MAX_OUTPUT_SIZE;
    let tag_size = if ds.get_bool()? {
      Some(ds.get_u64()? % MAX_OUTPUT_SIZE)
    } else {
      None
    };

    Ok(Self {
      modifier,
      cleartext,
      cipher,
      aad,
      ciphertext_size,
      tag_size,
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
      "key": self.cipher.key.to_hex(),
      "iv": self.cipher.iv.to_hex(),
      "cleartext": self.cleartext.to_hex(),
      "aad": self.aad.as_ref().map(Buffer::to_hex),
      "ciphertextSize": self.ciphertext_size,
      "tagSize": self.tag_size,
    })
  }
}

/// Symmetric (optionally authenticated) decryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymmetricDecrypt {
  pub modifier: Modifier,
  pub ciphertext: Buffer,
  pub cipher: SymmetricCipher,
  pub tag: Option<Buffer>,
  pub aad: Option<Buffer>,
  /// Size of the output buffer the backend must respect.
  pub cleartext_size: u64,
}

impl SymmetricDecrypt {
  /// Build the decryption matching an encryption and its result, for the
  /// round-trip check. Same cipher and key material, the produced
  /// ciphertext and tag as inputs, caller-chosen output size and AAD, and
  /// a fresh modifier.
  #[must_use]
  pub fn from_encrypt(
    op: &SymmetricEncrypt,
    result: &Ciphertext,
    cleartext_size: u64,
    aad: Option<Buffer>,
    modifier: Modifier,
  ) -> Self {
    Self {
      modifier,
      ciphertext: result.ciphertext.clone(),
      cipher: op.cipher.clone(),
      tag: result.tag.clone(),
      aad,
      cleartext_size,
    }
  }
}

impl Operation for SymmetricDecrypt {
  const NAME: &'static str = "SymmetricDecrypt";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    let ciphertext = Buffer::read(ds)?;
    let cipher = SymmetricCipher::read(ds)?;
    let tag = if ds.get_bool()? { Some(Buffer::read(ds)?) } else { None };
    let aad = if ds.get_bool()? { Some(Buffer::read(ds)?) } else { None };
    let cleartext_size = ds.get_u64()? % MAX_OUTPUT_SIZE;

    Ok(Self {
      modifier,
      ciphertext,
      cipher,
      tag,
      aad,
      cleartext_size,
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
      "key": self.cipher.key.to_hex(),
      "iv": self.cipher.iv.to_hex(),
      "ciphertext": self.ciphertext.to_hex(),
      "tag": self.tag.as_ref().map(Buffer::to_hex),
      "aad": self.aad.as_ref().map(Buffer::to_hex),
      "cleartextSize": self.cleartext_size,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ids::CipherKind, ops::tests::chunk};

  fn encrypt_stream(aad: Option<&[u8]>, tag_size: Option<u64>) -> alloc::vec::Vec<u8> {
    let mut input = chunk(b"hello");
    input.extend(chunk(&[0u8; 12])); // iv
    input.extend(chunk(&[0u8; 16])); // key
    input.extend(CipherKind::AES_128_GCM.id().to_le_bytes());
    match aad {
      Some(aad) => {
        input.push(1);
        input.extend(chunk(aad));
      }
      None => input.push(0),
    }
    input.extend(4096u64.to_le_bytes());
    match tag_size {
      Some(n) => {
        input.push(1);
        input.extend(n.to_le_bytes());
      }
      None => input.push(0),
    }
    input
  }

  #[test]
  fn encrypt_read_with_tag_and_aad() {
    let input = encrypt_stream(Some(b"ad"), Some(16));
    let mut ds = Datasource::new(&input);
    let op = SymmetricEncrypt::read(&mut ds, Modifier::empty()).unwrap();

    assert_eq!(op.cleartext.as_slice(), b"hello");
    assert_eq!(op.aad.as_ref().map(Buffer::as_slice), Some(&b"ad"[..]));
    assert_eq!(op.tag_size, Some(16));
    assert_eq!(op.ciphertext_size, 4096);
    assert_eq!(op.algorithm(), "AES_128_GCM");
  }

  #[test]
  fn encrypt_read_tagless() {
    let input = encrypt_stream(None, None);
    let mut ds = Datasource::new(&input);
    let op = SymmetricEncrypt::read(&mut ds, Modifier::empty()).unwrap();
    assert!(op.aad.is_none());
    assert!(op.tag_size.is_none());
  }

  #[test]
  fn from_encrypt_mirrors_key_material() {
    let input = encrypt_stream(Some(b"ad"), Some(16));
    let mut ds = Datasource::new(&input);
    let enc = SymmetricEncrypt::read(&mut ds, Modifier::empty()).unwrap();

    let produced = Ciphertext {
      ciphertext: Buffer::from(&[0xc1, 0xc2][..]),
      tag: Some(Buffer::from(&[0xdd; 16][..])),
    };
    let dec = SymmetricDecrypt::from_encrypt(&enc, &produced, enc.cleartext.len() as u64 + 32, enc.aad.clone(), Modifier::empty());

    assert_eq!(dec.cipher, enc.cipher);
    assert_eq!(dec.ciphertext, produced.ciphertext);
    assert_eq!(dec.tag, produced.tag);
    assert_eq!(dec.aad, enc.aad);
    assert_eq!(dec.cleartext_size, 37);
    assert!(dec.modifier.is_empty());
  }
}
