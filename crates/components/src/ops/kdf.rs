//! Key-derivation operations.

use alloc::string::{String, ToString};

use datasource::{Datasource, OutOfData};
use serde_json::{json, Value};

use super::{modifier_accessors, Operation, MAX_ITERATIONS, MAX_KEY_SIZE};
use crate::{
  ids::DigestKind,
  primitive::{Buffer, Modifier},
};

/// scrypt (RFC 7914).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfScrypt {
  pub modifier: Modifier,
  pub password: Buffer,
  pub salt: Buffer,
  pub n: u64,
  pub r: u64,
  pub p: u64,
  pub key_size: u64,
}

impl Operation for KdfScrypt {
  const NAME: &'static str = "KDF_SCRYPT";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      password: Buffer::read(ds)?,
      salt: Buffer::read(ds)?,
      n: ds.get_u64()? % MAX_ITERATIONS,
      r: ds.get_u64()? % 64,
      p: ds.get_u64()? % 64,
      key_size: ds.get_u64()? % MAX_KEY_SIZE,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    String::from("scrypt")
  }

  fn to_json(&self) -> Value {
    json!({
      "password": self.password.to_hex(),
      "salt": self.salt.to_hex(),
      "N": self.n,
      "r": self.r,
      "p": self.p,
      "keySize": self.key_size,
    })
  }
}

/// HKDF (RFC 5869).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfHkdf {
  pub modifier: Modifier,
  pub digest_type: DigestKind,
  pub password: Buffer,
  pub salt: Buffer,
  pub info: Buffer,
  pub key_size: u64,
}

impl Operation for KdfHkdf {
  const NAME: &'static str = "KDF_HKDF";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      digest_type: DigestKind::from_id(ds.get_u64()?),
      password: Buffer::read(ds)?,
      salt: Buffer::read(ds)?,
      info: Buffer::read(ds)?,
      key_size: ds.get_u64()? % MAX_KEY_SIZE,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.digest_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "digest": self.digest_type.to_string(),
      "password": self.password.to_hex(),
      "salt": self.salt.to_hex(),
      "info": self.info.to_hex(),
      "keySize": self.key_size,
    })
  }
}

/// TLS 1.x pseudo-random function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfTls1Prf {
  pub modifier: Modifier,
  pub digest_type: DigestKind,
  pub secret: Buffer,
  pub seed: Buffer,
  pub key_size: u64,
}

impl Operation for KdfTls1Prf {
  const NAME: &'static str = "KDF_TLS1_PRF";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      digest_type: DigestKind::from_id(ds.get_u64()?),
      secret: Buffer::read(ds)?,
      seed: Buffer::read(ds)?,
      key_size: ds.get_u64()? % MAX_KEY_SIZE,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.digest_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "digest": self.digest_type.to_string(),
      "secret": self.secret.to_hex(),
      "seed": self.seed.to_hex(),
      "keySize": self.key_size,
    })
  }
}

macro_rules! pbkdf_variant {
  ($(#[$meta:meta])* $ty:ident, $name:literal) => {
    $(#[$meta])*
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct $ty {
      pub modifier: Modifier,
      pub digest_type: DigestKind,
      pub password: Buffer,
      pub salt: Buffer,
      pub iterations: u64,
      pub key_size: u64,
    }

    impl Operation for $ty {
      const NAME: &'static str = $name;
      const MAX_OPERATIONS: usize = 20;

      fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
        Ok(Self {
          modifier,
          digest_type: DigestKind::from_id(ds.get_u64()?),
          password: Buffer::read(ds)?,
          salt: Buffer::read(ds)?,
          iterations: ds.get_u64()? % MAX_ITERATIONS,
          key_size: ds.get_u64()? % MAX_KEY_SIZE,
        })
      }

      modifier_accessors!();

      fn algorithm(&self) -> String {
        self.digest_type.to_string()
      }

      fn to_json(&self) -> Value {
        json!({
          "digest": self.digest_type.to_string(),
          "password": self.password.to_hex(),
          "salt": self.salt.to_hex(),
          "iterations": self.iterations,
          "keySize": self.key_size,
        })
      }
    }
  };
}

pbkdf_variant! {
  /// Generic password-based KDF.
  KdfPbkdf, "KDF_PBKDF"
}
pbkdf_variant! {
  /// PBKDF1 (RFC 8018 §5.1).
  KdfPbkdf1, "KDF_PBKDF1"
}
pbkdf_variant! {
  /// PBKDF2 (RFC 8018 §5.2).
  KdfPbkdf2, "KDF_PBKDF2"
}

/// Argon2 password hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfArgon2 {
  pub modifier: Modifier,
  pub password: Buffer,
  pub salt: Buffer,
  /// 0 = Argon2d, 1 = Argon2i, 2 = Argon2id.
  pub variant: u8,
  pub threads: u8,
  pub memory: u64,
  pub iterations: u64,
  pub key_size: u64,
}

impl Operation for KdfArgon2 {
  const NAME: &'static str = "KDF_ARGON2";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      password: Buffer::read(ds)?,
      salt: Buffer::read(ds)?,
      variant: ds.get_u8()? % 3,
      threads: ds.get_u8()? % 16,
      memory: ds.get_u64()? % (64 * 1024),
      iterations: ds.get_u64()? % 16,
      key_size: ds.get_u64()? % MAX_KEY_SIZE,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    String::from(match self.variant {
      0 => "Argon2d",
      1 => "Argon2i",
      _ => "Argon2id",
    })
  }

  fn to_json(&self) -> Value {
    json!({
      "variant": self.variant,
      "password": self.password.to_hex(),
      "salt": self.salt.to_hex(),
      "threads": self.threads,
      "memory": self.memory,
      "iterations": self.iterations,
      "keySize": self.key_size,
    })
  }
}

/// SSH key derivation (RFC 4253 §7.2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfSsh {
  pub modifier: Modifier,
  pub digest_type: DigestKind,
  pub k: Buffer,
  pub h: Buffer,
  pub session_id: Buffer,
  /// Key letter `A`..`F`, reduced from the stream byte.
  pub kind: u8,
  pub key_size: u64,
}

impl Operation for KdfSsh {
  const NAME: &'static str = "KDF_SSH";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      digest_type: DigestKind::from_id(ds.get_u64()?),
      k: Buffer::read(ds)?,
      h: Buffer::read(ds)?,
      session_id: Buffer::read(ds)?,
      kind: ds.get_u8()? % 6,
      key_size: ds.get_u64()? % MAX_KEY_SIZE,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.digest_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "digest": self.digest_type.to_string(),
      "k": self.k.to_hex(),
      "h": self.h.to_hex(),
      "sessionID": self.session_id.to_hex(),
      "type": self.kind,
      "keySize": self.key_size,
    })
  }
}

/// ANSI X9.63 KDF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfX963 {
  pub modifier: Modifier,
  pub digest_type: DigestKind,
  pub secret: Buffer,
  pub info: Buffer,
  pub key_size: u64,
}

impl Operation for KdfX963 {
  const NAME: &'static str = "KDF_X963";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      digest_type: DigestKind::from_id(ds.get_u64()?),
      secret: Buffer::read(ds)?,
      info: Buffer::read(ds)?,
      key_size: ds.get_u64()? % MAX_KEY_SIZE,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.digest_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "digest": self.digest_type.to_string(),
      "secret": self.secret.to_hex(),
      "info": self.info.to_hex(),
      "keySize": self.key_size,
    })
  }
}

/// bcrypt-based key derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfBcrypt {
  pub modifier: Modifier,
  pub digest_type: DigestKind,
  pub secret: Buffer,
  pub salt: Buffer,
  pub iterations: u64,
  pub key_size: u64,
}

impl Operation for KdfBcrypt {
  const NAME: &'static str = "KDF_BCRYPT";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      digest_type: DigestKind::from_id(ds.get_u64()?),
      secret: Buffer::read(ds)?,
      salt: Buffer::read(ds)?,
      iterations: ds.get_u64()? % (1 << 16),
      key_size: ds.get_u64()? % MAX_KEY_SIZE,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.digest_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "digest": self.digest_type.to_string(),
      "secret": self.secret.to_hex(),
      "salt": self.salt.to_hex(),
      "iterations": self.iterations,
      "keySize": self.key_size,
    })
  }
}

/// The PRF selector for SP 800-108: digest mode (HMAC) or cipher mode (CMAC).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfMechanism {
  /// `true` = HMAC over a digest, `false` = CMAC over a cipher.
  pub mode: bool,
  /// Digest or cipher ID, depending on `mode`.
  pub kind: u64,
}

impl KdfMechanism {
  fn read(ds: &mut Datasource<'_>) -> Result<Self, OutOfData> {
    Ok(Self {
      mode: ds.get_bool()?,
      kind: ds.get_u64()?,
    })
  }
}

/// NIST SP 800-108 KDF in counter mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfSp800_108 {
  pub modifier: Modifier,
  pub mech: KdfMechanism,
  pub secret: Buffer,
  pub salt: Buffer,
  pub label: Buffer,
  pub key_size: u64,
}

impl Operation for KdfSp800_108 {
  const NAME: &'static str = "KDF_SP_800_108";
  const MAX_OPERATIONS: usize = 20;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      mech: KdfMechanism::read(ds)?,
      secret: Buffer::read(ds)?,
      salt: Buffer::read(ds)?,
      label: Buffer::read(ds)?,
      key_size: ds.get_u64()? % MAX_KEY_SIZE,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    if self.mech.mode {
      DigestKind::from_id(self.mech.kind).to_string()
    } else {
      crate::ids::CipherKind::from_id(self.mech.kind).to_string()
    }
  }

  fn to_json(&self) -> Value {
    json!({
      "mech": { "mode": self.mech.mode, "type": self.mech.kind },
      "secret": self.secret.to_hex(),
      "salt": self.salt.to_hex(),
      "label": self.label.to_hex(),
      "keySize": self.key_size,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ops::tests::chunk;

  #[test]
  fn hkdf_read_order() {
    let mut input = DigestKind::SHA256.id().to_le_bytes().to_vec();
    input.extend(chunk(b"pw"));
    input.extend(chunk(b"salt"));
    input.extend(chunk(b"info"));
    input.extend(32u64.to_le_bytes());
    let mut ds = Datasource::new(&input);

    let op = KdfHkdf::read(&mut ds, Modifier::empty()).unwrap();
    assert_eq!(op.password.as_slice(), b"pw");
    assert_eq!(op.salt.as_slice(), b"salt");
    assert_eq!(op.info.as_slice(), b"info");
    assert_eq!(op.key_size, 32);
    assert_eq!(op.algorithm(), "SHA-256");
  }

  #[test]
  fn key_size_is_capped() {
    let mut input = DigestKind::SHA256.id().to_le_bytes().to_vec();
    input.extend(chunk(b""));
    input.extend(chunk(b""));
    input.extend(chunk(b""));
    input.extend(u64::MAX.to_le_bytes());
    let mut ds = Datasource::new(&input);

    let op = KdfHkdf::read(&mut ds, Modifier::empty()).unwrap();
    assert!(op.key_size < MAX_KEY_SIZE);
  }

  #[test]
  fn argon2_variant_names() {
    let mut base = chunk(b"pw");
    base.extend(chunk(b"salt"));
    for (byte, expected) in [(0u8, "Argon2d"), (1, "Argon2i"), (2, "Argon2id")] {
      let mut input = base.clone();
      input.push(byte);
      input.push(4);
      input.extend(1024u64.to_le_bytes());
      input.extend(3u64.to_le_bytes());
      input.extend(32u64.to_le_bytes());
      let mut ds = Datasource::new(&input);
      let op = KdfArgon2::read(&mut ds, Modifier::empty()).unwrap();
      assert_eq!(op.algorithm(), expected);
    }
  }

  #[test]
  fn sp800_108_algorithm_follows_mechanism() {
    let mut input = alloc::vec![1u8];
    input.extend(DigestKind::SHA256.id().to_le_bytes());
    input.extend(chunk(b"s"));
    input.extend(chunk(b""));
    input.extend(chunk(b""));
    input.extend(16u64.to_le_bytes());
    let mut ds = Datasource::new(&input);
    let op = KdfSp800_108::read(&mut ds, Modifier::empty()).unwrap();
    assert!(op.mech.mode);
    assert_eq!(op.algorithm(), "SHA-256");
  }
}
