//! BLS12-381 operations.

use alloc::string::{String, ToString};

use datasource::{Datasource, OutOfData};
use serde_json::{json, Value};

use super::{modifier_accessors, Operation};
use crate::{
  ids::CurveKind,
  primitive::{Bignum, Buffer, Modifier},
  results::{EccPoint, G1, G2, OpOutput as _},
};

/// Compute the G1 public key for a private scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsPrivateToPublic {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub private: Bignum,
}

impl Operation for BlsPrivateToPublic {
  const NAME: &'static str = "BLS_PrivateToPublic";
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

/// BLS signing, over either a message (hash-and-sign) or an explicit G2
/// point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsSign {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub private: Bignum,
  /// `true` = sign `cleartext` (hash-to-curve first), `false` = sign
  /// `point` directly.
  pub hash_or_point: bool,
  pub point: G2,
  pub cleartext: Buffer,
  pub dest: Buffer,
  pub aug: Buffer,
}

impl Operation for BlsSign {
  const NAME: &'static str = "BLS_Sign";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      private: Bignum::read(ds)?,
      hash_or_point: ds.get_bool()?,
      point: G2::read(ds)?,
      cleartext: Buffer::read(ds)?,
      dest: Buffer::read(ds)?,
      aug: Buffer::read(ds)?,
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
      "hashOrPoint": self.hash_or_point,
      "point": self.point.to_json(),
      "cleartext": self.cleartext.to_hex(),
      "dest": self.dest.to_hex(),
      "aug": self.aug.to_hex(),
    })
  }
}

/// BLS signature verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsVerify {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub public: G1,
  pub signature: G2,
  pub cleartext: Buffer,
  pub dest: Buffer,
}

impl Operation for BlsVerify {
  const NAME: &'static str = "BLS_Verify";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      public: EccPoint::read(ds)?,
      signature: G2::read(ds)?,
      cleartext: Buffer::read(ds)?,
      dest: Buffer::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "pub": self.public.to_json(),
      "signature": self.signature.to_json(),
      "cleartext": self.cleartext.to_hex(),
      "dest": self.dest.to_hex(),
    })
  }
}

/// Pairing check over a G1/G2 pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsPairing {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub g1: G1,
  pub g2: G2,
}

impl Operation for BlsPairing {
  const NAME: &'static str = "BLS_Pairing";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      g1: EccPoint::read(ds)?,
      g2: G2::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "g1": self.g1.to_json(),
      "g2": self.g2.to_json(),
    })
  }
}

macro_rules! hash_to_group {
  ($(#[$meta:meta])* $ty:ident, $name:literal) => {
    $(#[$meta])*
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct $ty {
      pub modifier: Modifier,
      pub curve_type: CurveKind,
      pub cleartext: Buffer,
      pub dest: Buffer,
      pub aug: Buffer,
    }

    impl Operation for $ty {
      const NAME: &'static str = $name;
      const MAX_OPERATIONS: usize = 5;

      fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
        Ok(Self {
          modifier,
          curve_type: CurveKind::from_id(ds.get_u64()?),
          cleartext: Buffer::read(ds)?,
          dest: Buffer::read(ds)?,
          aug: Buffer::read(ds)?,
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
          "dest": self.dest.to_hex(),
          "aug": self.aug.to_hex(),
        })
      }
    }
  };
}

hash_to_group! {
  /// Hash a message to a G1 point.
  BlsHashToG1, "BLS_HashToG1"
}
hash_to_group! {
  /// Hash a message to a G2 point.
  BlsHashToG2, "BLS_HashToG2"
}

/// Membership check: is the point on the G1 curve?
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsIsG1OnCurve {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub g1: G1,
}

impl Operation for BlsIsG1OnCurve {
  const NAME: &'static str = "BLS_IsG1OnCurve";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      g1: EccPoint::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "g1": self.g1.to_json(),
    })
  }
}

/// Membership check: is the point on the G2 curve?
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsIsG2OnCurve {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub g2: G2,
}

impl Operation for BlsIsG2OnCurve {
  const NAME: &'static str = "BLS_IsG2OnCurve";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      g2: G2::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "g2": self.g2.to_json(),
    })
  }
}

/// Generate a BLS keypair from input key material. Nondeterministic when
/// the backend self-seeds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsGenerateKeyPair {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub ikm: Buffer,
}

impl Operation for BlsGenerateKeyPair {
  const NAME: &'static str = "BLS_GenerateKeyPair";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      ikm: Buffer::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "ikm": self.ikm.to_hex(),
    })
  }
}

/// Decompress a compressed G1 element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsDecompressG1 {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub compressed: Bignum,
}

impl Operation for BlsDecompressG1 {
  const NAME: &'static str = "BLS_Decompress_G1";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      compressed: Bignum::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "compressed": self.compressed.to_trimmed_string(),
    })
  }
}

/// Compress a G1 element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsCompressG1 {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub g1: G1,
}

impl Operation for BlsCompressG1 {
  const NAME: &'static str = "BLS_Compress_G1";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      g1: EccPoint::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "g1": self.g1.to_json(),
    })
  }
}

/// Decompress a compressed G2 element (two compressed coordinates).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsDecompressG2 {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub compressed: EccPoint,
}

impl Operation for BlsDecompressG2 {
  const NAME: &'static str = "BLS_Decompress_G2";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      compressed: EccPoint::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "compressed": self.compressed.to_json(),
    })
  }
}

/// Compress a G2 element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsCompressG2 {
  pub modifier: Modifier,
  pub curve_type: CurveKind,
  pub g2: G2,
}

impl Operation for BlsCompressG2 {
  const NAME: &'static str = "BLS_Compress_G2";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      curve_type: CurveKind::from_id(ds.get_u64()?),
      g2: G2::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.curve_type.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "curve": self.curve_type.to_string(),
      "g2": self.g2.to_json(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ops::tests::chunk;

  #[test]
  fn sign_reads_point_and_message_fields() {
    let mut input = CurveKind::BLS12_381.id().to_le_bytes().to_vec();
    input.extend(chunk(b"3"));
    input.push(1);
    for coord in ["1", "2", "3", "4"] {
      input.extend(chunk(coord.as_bytes()));
    }
    input.extend(chunk(b"msg"));
    input.extend(chunk(b"dst"));
    input.extend(chunk(b""));
    let mut ds = Datasource::new(&input);

    let op = BlsSign::read(&mut ds, Modifier::empty()).unwrap();
    assert!(op.hash_or_point);
    assert_eq!(op.point.w.as_str(), "2");
    assert_eq!(op.cleartext.as_slice(), b"msg");
    assert_eq!(op.dest.as_slice(), b"dst");
    assert_eq!(op.algorithm(), "BLS12_381");
  }

  #[test]
  fn hash_to_g1_and_g2_share_shape() {
    let mut input = CurveKind::BLS12_381.id().to_le_bytes().to_vec();
    input.extend(chunk(b"m"));
    input.extend(chunk(b"d"));
    input.extend(chunk(b"a"));

    let mut ds = Datasource::new(&input);
    let g1 = BlsHashToG1::read(&mut ds, Modifier::empty()).unwrap();
    let mut ds = Datasource::new(&input);
    let g2 = BlsHashToG2::read(&mut ds, Modifier::empty()).unwrap();

    assert_eq!(g1.cleartext, g2.cleartext);
    assert_eq!(BlsHashToG1::NAME, "BLS_HashToG1");
    assert_eq!(BlsHashToG2::NAME, "BLS_HashToG2");
  }

  #[test]
  fn is_g2_on_curve_reads_four_coordinates() {
    let mut input = CurveKind::BLS12_381.id().to_le_bytes().to_vec();
    for coord in ["9", "8", "7", "6"] {
      input.extend(chunk(coord.as_bytes()));
    }
    let mut ds = Datasource::new(&input);
    let op = BlsIsG2OnCurve::read(&mut ds, Modifier::empty()).unwrap();
    assert_eq!(op.g2.v.as_str(), "9");
    assert_eq!(op.g2.y.as_str(), "6");
  }
}
