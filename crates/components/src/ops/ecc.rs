//! Elliptic-curve operations: key handling, ECDSA, ECDH, ECIES.

use alloc::string::{String, ToString};

use datasource::{Datasource, OutOfData};
use serde_json::{json, Value};

use super::{modifier_accessors, Operation};
use crate::{
  ids::{CipherKind, CurveKind},
  primitive::{Bignum, Buffer, Modifier},
  results::{EccPoint, EcdsaSignature},
};

/// Compute the public key for a private scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EccPrivateToPublic {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub private: Bignum,
}

impl Operation for EccPrivateToPublic {
  const NAME: &'static str = "ECC_PrivateToPublic";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      private: Bignum::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "priv": self.private.to_trimmed_string(),
    })
  }
}

/// Check whether a point is a valid public key on the curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EccValidatePubkey {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub public: EccPoint,
}

impl Operation for EccValidatePubkey {
  const NAME: &'static str = "ECC_ValidatePubkey";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      public: EccPoint::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "pub": crate::results::OpOutput::to_json(&self.public),
    })
  }
}

/// Generate a fresh keypair. Nondeterministic by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EccGenerateKeyPair {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
}

impl Operation for EccGenerateKeyPair {
  const NAME: &'static str = "ECC_GenerateKeyPair";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({ "curve": self.curve_type.to_string() })
  }
}

/// ECDSA signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSign {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub private: Bignum,
  pub nonce: Bignum,
  pub cleartext: Buffer,
  /// 0 = random nonce, 1 = RFC 6979, 2 = the `nonce` field.
  pub nonce_source: u8,
  pub digest_type: crate::ids::DigestKind,
}

impl EcdsaSign {
  /// Whether the backend is asked to draw a random nonce, which makes the
  /// signature nondeterministic on non-Edwards curves.
  #[inline]
  #[must_use]
  pub const fn use_random_nonce(&self) -> bool {
    self.nonce_source == 0
  }
}

impl Operation for EcdsaSign {
  const NAME: &'static str = "ECDSA_Sign";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      private: Bignum::read(ds)?,
      nonce: Bignum::read(ds)?,
      cleartext: Buffer::read(ds)?,
      nonce_source: ds.get_u8()? % 3,
      digest_type: crate::ids::DigestKind::from_id(ds.get_u64()?),
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "priv": self.private.to_trimmed_string(),
      "nonce": self.nonce.to_trimmed_string(),
      "nonceSource": self.nonce_source,
      "cleartext": self.cleartext.to_hex(),
      "digest": self.digest_type.to_string(),
    })
  }
}

/// ECDSA verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaVerify {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub cleartext: Buffer,
  pub digest_type: crate::ids::DigestKind,
  pub signature: EcdsaSignature,
}

impl Operation for EcdsaVerify {
  const NAME: &'static str = "ECDSA_Verify";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      cleartext: Buffer::read(ds)?,
      digest_type: crate::ids::DigestKind::from_id(ds.get_u64()?),
      signature: EcdsaSignature::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "cleartext": self.cleartext.to_hex(),
      "digest": self.digest_type.to_string(),
      "signature": crate::results::OpOutput::to_json(&self.signature),
    })
  }
}

/// ECDH shared-secret derivation over two public keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdhDerive {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub pub1: EccPoint,
  pub pub2: EccPoint,
}

impl EcdhDerive {
  /// Build a derive operation from two known-good public keys, as the
  /// synthesis path does.
  #[must_use]
  pub const fn synthesized(modifier: Modifier, curve_type: CurveKind, pub1: EccPoint, pub2: EccPoint) -> Self {
    Self {
      modifier,
      curve_type,
      pub1,
      pub2,
    }
  }
}

impl Operation for EcdhDerive {
  const NAME: &'static str = "ECDH_Derive";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      pub1: EccPoint::read(ds)?,
      pub2: EccPoint::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "pub1": crate::results::OpOutput::to_json(&self.pub1),
      "pub2": crate::results::OpOutput::to_json(&self.pub2),
    })
  }
}

macro_rules! ecies_variant {
  ($(#[$meta:meta])* $ty:ident, $name:literal, $payload:ident, $payload_key:literal) => {
    $(#[$meta])*
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct $ty {
      pub modifier: Modifier,
      pub curve_type: CurveKind,
      pub $payload: Buffer,
      pub cipher_type: CipherKind,
      pub private: Bignum,
      pub public: EccPoint,
      pub iv: Option<Buffer>,
    }

    impl Operation for $ty {
      const NAME: &'static str = $name;
      const MAX_OPERATIONS: usize = 5;

      fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
        Ok(Self {
          modifier,
          curve_type: CurveKind::from_id(ds.get_u64()?),
          $payload: Buffer::read(ds)?,
          cipher_type: CipherKind::from_id(ds.get_u64()?),
          private: Bignum::read(ds)?,
          public: EccPoint::read(ds)?,
          iv: if ds.get_bool()? { Some(Buffer::read(ds)?) } else { None },
        })
      }

      modifier_accessors!();

      fn algorithm(&self) -> String {
        self.curve_type.to_string()
      }

      fn to_json(&self) -> Value {
        json!({
          "curve": self.curve_type.to_string(),
          $payload_key: self.$payload.to_hex(),
          "cipher": self.cipher_type.to_string(),
          "priv": self.private.to_trimmed_string(),
          "pub": crate::results::OpOutput::to_json(&self.public),
          "iv": self.iv.as_ref().map(Buffer::to_hex),
        })
      }
    }
  };
}

ecies_variant! {
  /// ECIES encryption.
  EciesEncrypt, "ECIES_Encrypt", cleartext, "cleartext"
}
ecies_variant! {
  /// ECIES decryption.
  EciesDecrypt, "ECIES_Decrypt", ciphertext, "ciphertext"
}
