//! The bignum calculator operation.

use alloc::string::{String, ToString};

use datasource::{Datasource, OutOfData};
use serde_json::{json, Value};

use super::{modifier_accessors, Operation};
use crate::{
  ids::CalcOp,
  primitive::{Bignum, Modifier},
};

/// One bignum calculator invocation: an operator over up to four operands,
/// optionally reduced by a modulus.
///
/// The `modulo` field is never decoded from the stream; the
/// modular-arithmetic executor variants pin it after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BignumCalc {
  pub modifier: Modifier,
  pub calc_op: CalcOp,
  pub bn0: Bignum,
  pub bn1: Bignum,
  pub bn2: Bignum,
  pub bn3: Bignum,
  pub modulo: Option<Bignum>,
}

impl Operation for BignumCalc {
  const NAME: &'static str = "BignumCalc";
  const MAX_OPERATIONS: usize = 5;

  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData> {
    Ok(Self {
      modifier,
      calc_op: CalcOp::from_id(ds.get_u64()?),
      bn0: Bignum::read(ds)?,
      bn1: Bignum::read(ds)?,
      bn2: Bignum::read(ds)?,
      bn3: Bignum::read(ds)?,
      modulo: None,
    })
  }

  modifier_accessors!();

  fn algorithm(&self) -> String {
    self.calc_op.to_string()
  }

  fn to_json(&self) -> Value {
    json!({
      "calcOp": self.calc_op.to_string(),
      "bn0": self.bn0.to_trimmed_string(),
      "bn1": self.bn1.to_trimmed_string(),
      "bn2": self.bn2.to_trimmed_string(),
      "bn3": self.bn3.to_trimmed_string(),
      "modulo": self.modulo.as_ref().map(Bignum::to_trimmed_string),
    })
  }
}
