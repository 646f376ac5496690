//! Finite-field Diffie-Hellman operations.

use alloc::string::String;

use datasource::{Datasource, OutOfData};
use serde_json::{json, Value};

use super::{modifier_accessors, Operation};
use crate::primitive::{Bignum, Modifier};

/// Derive the DH shared secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DhDerive {
  pub modifier: Modifier,
  pub prime: Bignum,
  pub base: Bignum,
  pub public: Bignum,
  pub private: Bignum,
}

impl Operation for DhDerive {
  const NAME: &'static str = "DH_Derive";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      prime: Bignum::read(ds)?,
      base: Bignum::read(ds)?,
      public: Bignum::read(ds)?,
      private: Bignum::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    String::from("DH")
  }

  fn to_json(&self) -> Value {
    json!({
      "prime": self.prime.to_trimmed_string(),
      "base": self.base.to_trimmed_string(),
      "pub": self.public.to_trimmed_string(),
      "priv": self.private.to_trimmed_string(),
    })
  }
}

/// Generate a DH keypair for the given group. Nondeterministic by
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DhGenerateKeyPair {
  pub modifier: Modifier,
  pub prime: Bignum,
  pub base: Bignum,
}

impl Operation for DhGenerateKeyPair {
  const NAME: &'static str = "DH_GenerateKeyPair";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      prime: Bignum::read(ds)?,
      base: Bignum::read(ds)?,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    String::from("DH")
  }

  fn to_json(&self) -> Value {
    json!({
      "prime": self.prime.to_trimmed_string(),
      "base": self.base.to_trimmed_string(),
    })
  }
}
