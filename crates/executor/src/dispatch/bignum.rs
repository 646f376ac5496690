//! Policy for the bignum calculator.

use components::{ids::CalcOp, ops::BignumCalc, Bignum};

use super::Dispatch;
use crate::{config::MAX_BIGNUM_SIZE, module::Module, options::Options, pool::set_bignum};

impl Dispatch for BignumCalc {
  type Output = Bignum;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Bignum> {
    if !Options::have(&options.calc_ops, self.calc_op.id()) {
      return None;
    }

    // Prevent timeouts.
    if self.bn0.len() > MAX_BIGNUM_SIZE {
      return None;
    }
    if self.bn1.len() > MAX_BIGNUM_SIZE {
      return None;
    }
    if self.bn2.len() > MAX_BIGNUM_SIZE {
      return None;
    }
    if self.bn3.len() > MAX_BIGNUM_SIZE {
      return None;
    }

    if self.modulo.is_some() && !module.supports_modular_bignum_calc() {
      return None;
    }

    // Tighter per-operator caps, in bytes of the decimal representation.
    if self.calc_op == CalcOp::SET_BIT && self.bn1.len() > 4 {
      // A huge bit index is a memory-exhaustion request.
      return None;
    }
    if self.calc_op == CalcOp::EXP && (self.bn0.len() > 5 || self.bn1.len() > 2) {
      return None;
    }
    if self.calc_op == CalcOp::MOD_LSHIFT && self.bn1.len() > 4 {
      return None;
    }
    if self.calc_op == CalcOp::EXP2 && self.bn0.len() > 4 {
      return None;
    }

    module.bignum_calc(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &Bignum, _options: &Options) {
    set_bignum(output.to_trimmed_string());
  }

  fn dont_compare(&self) -> bool {
    self.calc_op == CalcOp::RAND
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use components::Modifier;

  use super::*;

  struct CalcModule {
    modular: bool,
    calls: AtomicUsize,
  }

  impl CalcModule {
    fn new(modular: bool) -> Self {
      Self {
        modular,
        calls: AtomicUsize::new(0),
      }
    }
  }

  impl Module for CalcModule {
    fn id(&self) -> u64 {
      components::module_id("calc")
    }
    fn name(&self) -> &str {
      "calc"
    }
    fn supports_modular_bignum_calc(&self) -> bool {
      self.modular
    }
    fn bignum_calc(&self, _op: &BignumCalc) -> Option<Bignum> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Some(Bignum::from("99"))
    }
  }

  fn calc(op: CalcOp, bn0: &str, bn1: &str) -> BignumCalc {
    BignumCalc {
      modifier: Modifier::empty(),
      calc_op: op,
      bn0: Bignum::from(bn0),
      bn1: Bignum::from(bn1),
      bn2: Bignum::default(),
      bn3: Bignum::default(),
      modulo: None,
    }
  }

  #[test]
  fn exp_operand_caps() {
    let module = CalcModule::new(false);
    let options = Options::new();

    // A = "12345678" is 8 bytes, beyond the 5-byte cap.
    assert!(calc(CalcOp::EXP, "12345678", "2").call_module(&module, &options).is_none());
    assert_eq!(module.calls.load(Ordering::SeqCst), 0);

    // A within 5 bytes, B within 2 bytes.
    assert!(calc(CalcOp::EXP, "12345", "99").call_module(&module, &options).is_some());
    // B beyond 2 bytes.
    assert!(calc(CalcOp::EXP, "12345", "100").call_module(&module, &options).is_none());
  }

  #[test]
  fn set_bit_and_shift_caps() {
    let module = CalcModule::new(false);
    let options = Options::new();

    assert!(calc(CalcOp::SET_BIT, "1", "99999").call_module(&module, &options).is_none());
    assert!(calc(CalcOp::SET_BIT, "1", "9999").call_module(&module, &options).is_some());
    assert!(
      calc(CalcOp::MOD_LSHIFT, "1", "99999")
        .call_module(&module, &options)
        .is_none()
    );
    assert!(calc(CalcOp::EXP2, "99999", "").call_module(&module, &options).is_none());
    assert!(calc(CalcOp::EXP2, "9999", "").call_module(&module, &options).is_some());
  }

  #[test]
  fn general_operand_cap() {
    let module = CalcModule::new(false);
    let huge = "1".repeat(MAX_BIGNUM_SIZE + 1);
    assert!(calc(CalcOp::ADD, &huge, "1").call_module(&module, &Options::new()).is_none());
  }

  #[test]
  fn modulo_requires_capability() {
    let plain = CalcModule::new(false);
    let modular = CalcModule::new(true);
    let mut op = calc(CalcOp::ADD, "1", "2");
    op.modulo = Some(Bignum::from("17"));

    assert!(op.call_module(&plain, &Options::new()).is_none());
    assert!(op.call_module(&modular, &Options::new()).is_some());
  }

  #[test]
  fn calc_op_allow_set_applies() {
    let module = CalcModule::new(false);
    let options = Options::new().with_calc_ops([CalcOp::SUB.id()]);
    assert!(calc(CalcOp::ADD, "1", "2").call_module(&module, &options).is_none());
    assert!(calc(CalcOp::SUB, "1", "2").call_module(&module, &options).is_some());
  }

  #[test]
  fn rand_results_are_not_compared() {
    assert!(calc(CalcOp::RAND, "", "").dont_compare());
    assert!(!calc(CalcOp::ADD, "", "").dont_compare());
  }

  #[test]
  fn results_feed_the_bignum_pool() {
    let module = CalcModule::new(false);
    let op = calc(CalcOp::ADD, "1", "2");
    let output = module.bignum_calc(&op).unwrap();
    op.postprocess(&module, &output, &Options::new());
    assert!(crate::pool::POOL_BIGNUM.contains(&String::from("99")));
  }
}
