//! Operations that fit no other family.

use alloc::{
  format,
  string::{String, ToString},
};

use datasource::{Datasource, OutOfData};
use serde_json::{json, Value};

use super::{modifier_accessors, Operation};
use crate::{
  ids::CurveKind,
  primitive::{Bignum, Buffer, Modifier},
};

/// Schnorrkel (sr25519) signature verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sr25519Verify {
  pub modifier: Modifier,
  pub public: Bignum,
  pub sig_r: Bignum,
  pub sig_s: Bignum,
  pub cleartext: Buffer,
}

impl Operation for Sr25519Verify {
  const NAME: &'static str = "SR25519_Verify";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      public: Bignum::read(ds)?,
      sig_r: Bignum::read(ds)?,
      sig_s: Bignum::read(ds)?,
      cleartext: Buffer::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    CurveKind::SR25519.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "pub": self.public.to_trimmed_string(),
      "signature": [self.sig_r.to_trimmed_string(), self.sig_s.to_trimmed_string()],
      "cleartext": self.cleartext.to_hex(),
    })
  }
}

/// Backend-defined auxiliary operation, addressed by a raw 64-bit selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Misc {
  pub modifier: Modifier,
  pub operation: u64,
}

impl Operation for Misc {
  const NAME: &'static str = "Misc";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      operation: ds.get_u64()?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    format!("{:#018x}", self.operation)
  }

  fn to_json(&self) -> Value {
    json!({ "operation": self.operation })
  }
}
