//! The per-invocation execution pipeline.
//!
//! One [`Executor::run`] call derives a batch of `(module, operation)`
//! pairs from the byte stream, forces every loaded module to see at least
//! the first operation (broadcast fill), dispatches each entry through the
//! policy guard, postprocesses every result, and finally hands the result
//! set to the differential comparator.
//!
//! All batch entries share identical operation fields: each entry's
//! operation is rebuilt from a fresh cursor over the same payload bytes,
//! and only the modifier (drawn from the parent stream) differs. That is
//! what makes the comparison meaningful.

use std::{collections::BTreeSet, sync::Arc};

use components::{ids, ops::BignumCalc, Bignum, Modifier, OpOutput, Operation};
use datasource::{Datasource, OutOfData};
use serde_json::json;

use crate::{
  config,
  dispatch::Dispatch,
  fault,
  module::{Module, ModuleRegistry},
  options::Options,
  probe,
};

/// Decode a module ID from the stream and resolve it, honoring the
/// `force_module` override and the explicit deny-set.
pub(crate) fn decode_module(
  ds: &mut Datasource<'_>,
  modules: &ModuleRegistry,
  options: &Options,
) -> Result<Option<Arc<dyn Module>>, OutOfData> {
  let mut id = ds.get_u64()?;

  if let Some(forced) = options.force_module {
    id = forced;
  }

  if options.module_disabled(id) {
    return Ok(None);
  }

  Ok(modules.get(&id).cloned())
}

/// Executor for one operation type.
pub struct Executor<'a, O: Dispatch> {
  operation_id: u64,
  modules: &'a ModuleRegistry,
  options: &'a Options,
  /// Applied to every derived operation; used by the modular-arithmetic
  /// variants to pin a modulus.
  transform: Option<Box<dyn Fn(&mut O) + Send + Sync>>,
}

impl<'a, O: Dispatch> Executor<'a, O> {
  /// Create an executor over the loaded modules and options snapshot.
  #[must_use]
  pub fn new(modules: &'a ModuleRegistry, options: &'a Options) -> Self {
    Self {
      operation_id: ids::id_from_name(O::NAME),
      modules,
      options,
      transform: None,
    }
  }

  /// Create an executor that applies `transform` to every derived
  /// operation.
  #[must_use]
  pub fn with_transform(
    modules: &'a ModuleRegistry,
    options: &'a Options,
    transform: impl Fn(&mut O) + Send + Sync + 'static,
  ) -> Self {
    Self {
      operation_id: ids::id_from_name(O::NAME),
      modules,
      options,
      transform: Some(Box::new(transform)),
    }
  }

  /// Stable ID of the operation type this executor serves.
  #[inline]
  #[must_use]
  pub const fn operation_id(&self) -> u64 {
    self.operation_id
  }

  /// Build one operation. With a parent stream, the modifier comes from
  /// the parent, the derivation hook runs, and the executor transform
  /// applies; without one (diagnostic reconstruction) the operation is
  /// decoded verbatim with an empty modifier.
  fn get_op(&self, parent: Option<&mut Datasource<'_>>, data: &[u8]) -> Result<O, OutOfData> {
    let mut ds = Datasource::new(data);

    match parent {
      Some(parent) => {
        let modifier = Modifier::new(parent.get_data(0)?);
        let op = O::read(&mut ds, modifier)?;
        let mut op = op.refine(parent, self.modules, self.options);
        if let Some(transform) = &self.transform {
          transform(&mut op);
        }
        Ok(op)
      }
      None => O::read(&mut ds, Modifier::empty()),
    }
  }

  /// One fuzzer invocation: assemble, broadcast-fill, dispatch, compare.
  pub fn run(&self, parent: &mut Datasource<'_>, data: &[u8]) {
    let mut operations: Vec<(Arc<dyn Module>, O)> = Vec::new();

    // Batch assembly. A stream under-run at any point means "no more
    // operations this run"; the batch gathered so far still executes.
    loop {
      let entry = self.assemble_entry(parent, data);
      match entry {
        Ok(Some(pair)) => {
          operations.push(pair);
          // Cap the batch to bound invocation latency.
          if operations.len() == O::MAX_OPERATIONS {
            break;
          }
        }
        Ok(None) => {}
        Err(OutOfData) => break,
      }

      match parent.get_bool() {
        Ok(true) => {}
        Ok(false) | Err(_) => break,
      }
    }

    if operations.is_empty() {
      return;
    }

    // Broadcast fill: every loaded, non-disabled module that the stream
    // did not pick processes the first operation. This maximizes the
    // number of backends participating in each comparison.
    if let Some((_, first)) = operations.first() {
      let first = first.clone();
      let represented: BTreeSet<u64> = operations.iter().map(|(module, _)| module.id()).collect();
      for (id, module) in self.modules {
        if self.options.module_disabled(*id) || represented.contains(id) {
          continue;
        }
        operations.push((Arc::clone(module), first.clone()));
      }
    }

    // The gate intentionally counts the post-fill batch.
    if operations.len() < self.options.min_modules {
      return;
    }

    if self.options.debug {
      if let Some((_, first)) = operations.first() {
        println!("Running:\n{}", first.render());
      }
    }

    let mut results: Vec<(Arc<dyn Module>, Option<O::Output>)> = Vec::with_capacity(operations.len());

    for i in 0..operations.len() {
      // Adjacent entries on the same module must not share modifier
      // bytes, or they would probe the same nondeterministic path twice.
      if i > 0 {
        let (before, after) = operations.split_at_mut(i);
        if let (Some((prev_module, prev_op)), Some((module, op))) = (before.last(), after.first_mut()) {
          if prev_module.id() == module.id() && prev_op.modifier() == op.modifier() {
            op.modifier_mut().perturb();
          }
        }
      }

      let Some((module, op)) = operations.get(i) else { break };

      let output = op.call_module(module.as_ref(), self.options);

      if let Some(out) = &output {
        // Probe every output byte before the result is used anywhere.
        out.visit_bytes(&mut |bytes| probe::touch(bytes));

        if self.options.json_dump_enabled() {
          self.options.json_dump_line(&json!({
            "operation": op.to_json(),
            "result": out.to_json(),
          }));
        }
      }

      if self.options.debug {
        println!(
          "Module {} result:\n\n{}\n",
          module.name(),
          output.as_ref().map_or_else(|| String::from("(empty)"), OpOutput::render)
        );
      }

      if let Some(out) = &output {
        if !self.options.disable_tests {
          op.sanity_check(module.as_ref(), out);
        }
        op.postprocess(module.as_ref(), out, self.options);
      }

      results.push((Arc::clone(module), output));
    }

    if !self.options.no_compare {
      self.compare(&operations, &results, data);
    }
  }

  fn assemble_entry(
    &self,
    parent: &mut Datasource<'_>,
    data: &[u8],
  ) -> Result<Option<(Arc<dyn Module>, O)>, OutOfData> {
    let op = self.get_op(Some(parent), data)?;
    let module = decode_module(parent, self.modules, self.options)?;
    Ok(module.map(|module| (module, op)))
  }

  fn compare(
    &self,
    operations: &[(Arc<dyn Module>, O)],
    results: &[(Arc<dyn Module>, Option<O::Output>)],
    data: &[u8],
  ) {
    if results.len() < 2 {
      // Nothing to compare; skip the filtering as well.
      return;
    }

    let filtered: Vec<(&Arc<dyn Module>, &O::Output)> = results
      .iter()
      .filter_map(|(module, output)| output.as_ref().map(|out| (module, out)))
      .collect();

    if filtered.len() < 2 {
      return;
    }

    let Some((_, first_op)) = operations.first() else {
      return;
    };
    if first_op.dont_compare() {
      return;
    }

    for pair in filtered.windows(2) {
      if let [(prev_module, prev), (module, cur)] = pair {
        if prev == cur {
          continue;
        }

        // Reconstruct the operation from the raw bytes so the report is
        // independent of modifier perturbation and derivation hooks.
        let op = self.get_op(None, data).unwrap_or_else(|_| first_op.clone());

        println!("Difference detected\n");
        println!("Operation:\n{}", op.render());
        println!("Module {} result:\n\n{}\n", prev_module.name(), prev.render());
        println!("Module {} result:\n\n{}\n", module.name(), cur.render());

        fault::fatal(
          vec![prev_module.name().to_string(), module.name().to_string()],
          O::NAME,
          &op.algorithm(),
          "difference",
        );
      }
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Modular-arithmetic executor variants
// ─────────────────────────────────────────────────────────────────────────────

impl<'a> Executor<'a, BignumCalc> {
  /// Calculator executor with every operation reduced modulo the
  /// BLS12-381 scalar-field order.
  #[must_use]
  pub fn bignum_calc_mod_bls12_381_r(modules: &'a ModuleRegistry, options: &'a Options) -> Self {
    Self::with_transform(modules, options, |op: &mut BignumCalc| {
      op.modulo = Some(Bignum::from(config::BLS12_381_R));
    })
  }

  /// Calculator executor with every operation reduced modulo the
  /// BLS12-381 base-field prime.
  #[must_use]
  pub fn bignum_calc_mod_bls12_381_p(modules: &'a ModuleRegistry, options: &'a Options) -> Self {
    Self::with_transform(modules, options, |op: &mut BignumCalc| {
      op.modulo = Some(Bignum::from(config::BLS12_381_P));
    })
  }

  /// Calculator executor with every operation reduced modulo 2^256.
  #[must_use]
  pub fn bignum_calc_mod_2exp256(modules: &'a ModuleRegistry, options: &'a Options) -> Self {
    Self::with_transform(modules, options, |op: &mut BignumCalc| {
      op.modulo = Some(Bignum::from(config::MOD_2EXP256));
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use components::{ids::DigestKind, ops::Digest, Buffer};

  use super::*;

  /// Deterministic digest backend: output = cleartext length XOR-folded
  /// with the fixed `tint` byte, so two tints agree exactly when asked to.
  struct TintModule {
    name: String,
    tint: u8,
    calls: AtomicUsize,
  }

  impl TintModule {
    fn new(name: &str, tint: u8) -> Arc<Self> {
      Arc::new(Self {
        name: String::from(name),
        tint,
        calls: AtomicUsize::new(0),
      })
    }
  }

  impl Module for TintModule {
    fn id(&self) -> u64 {
      components::module_id(&self.name)
    }
    fn name(&self) -> &str {
      &self.name
    }
    fn digest(&self, op: &Digest) -> Option<Buffer> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      let mut acc = self.tint;
      for &b in op.cleartext.as_slice() {
        acc ^= b;
      }
      Some(Buffer::from(&[acc; 4][..]))
    }
  }

  fn registry(modules: &[Arc<TintModule>]) -> ModuleRegistry {
    modules
      .iter()
      .map(|m| (m.id(), Arc::clone(m) as Arc<dyn Module>))
      .collect()
  }

  /// Digest payload: cleartext plus digest ID.
  fn digest_payload(cleartext: &[u8], digest: DigestKind) -> Vec<u8> {
    let mut out = (cleartext.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(cleartext);
    out.extend(digest.id().to_le_bytes());
    out
  }

  /// Parent stream: one entry (empty modifier + module id), stop.
  fn single_entry_stream(module_id: u64) -> Vec<u8> {
    let mut out = 0u32.to_le_bytes().to_vec();
    out.extend(module_id.to_le_bytes());
    out.push(0); // stop
    out
  }

  #[test]
  fn equal_results_pass_comparison() {
    let a = TintModule::new("tint-a", 0);
    let b = TintModule::new("tint-b", 0);
    let modules = registry(&[Arc::clone(&a), Arc::clone(&b)]);
    let options = Options::new();
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);

    let payload = digest_payload(b"abc", DigestKind::SHA256);
    let stream = single_entry_stream(a.id());
    let mut parent = Datasource::new(&stream);

    // Broadcast fill pulls in module b; both produce identical bytes, so
    // the comparator returns without aborting.
    executor.run(&mut parent, &payload);
    assert_eq!(a.calls.load(Ordering::SeqCst), 1);
    assert_eq!(b.calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn broadcast_fill_covers_all_loaded_modules() {
    let a = TintModule::new("fill-a", 0);
    let b = TintModule::new("fill-b", 0);
    let c = TintModule::new("fill-c", 0);
    let modules = registry(&[Arc::clone(&a), Arc::clone(&b), Arc::clone(&c)]);
    let options = Options::new();
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);

    let payload = digest_payload(b"x", DigestKind::SHA256);
    let stream = single_entry_stream(b.id());
    let mut parent = Datasource::new(&stream);
    executor.run(&mut parent, &payload);

    for module in [&a, &b, &c] {
      assert_eq!(module.calls.load(Ordering::SeqCst), 1, "{} missed", module.name());
    }
  }

  #[test]
  fn disabled_modules_are_excluded_from_fill() {
    let a = TintModule::new("deny-a", 0);
    let b = TintModule::new("deny-b", 0);
    let modules = registry(&[Arc::clone(&a), Arc::clone(&b)]);
    let options = Options::new().disable_module(b.id());
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);

    let payload = digest_payload(b"x", DigestKind::SHA256);
    let stream = single_entry_stream(a.id());
    let mut parent = Datasource::new(&stream);
    executor.run(&mut parent, &payload);

    assert_eq!(a.calls.load(Ordering::SeqCst), 1);
    assert_eq!(b.calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn min_modules_gates_the_whole_invocation() {
    let a = TintModule::new("min-a", 0);
    let modules = registry(&[Arc::clone(&a)]);
    let options = Options::new().with_min_modules(2);
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);

    let payload = digest_payload(b"x", DigestKind::SHA256);
    let stream = single_entry_stream(a.id());
    let mut parent = Datasource::new(&stream);
    executor.run(&mut parent, &payload);

    assert_eq!(a.calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn empty_stream_is_a_no_op() {
    let a = TintModule::new("empty-a", 0);
    let modules = registry(&[Arc::clone(&a)]);
    let options = Options::new();
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);

    let mut parent = Datasource::new(&[]);
    executor.run(&mut parent, &digest_payload(b"x", DigestKind::SHA256));
    assert_eq!(a.calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn guarded_operations_never_dispatch() {
    let a = TintModule::new("guard-a", 0);
    let b = TintModule::new("guard-b", 1);
    let modules = registry(&[Arc::clone(&a), Arc::clone(&b)]);
    // Different tints WOULD differ, but the digest is disallowed, so both
    // results are absent and nothing is compared.
    let options = Options::new().with_digests([DigestKind::SHA1.id()]);
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);

    let payload = digest_payload(b"x", DigestKind::SHA256);
    let stream = single_entry_stream(a.id());
    let mut parent = Datasource::new(&stream);
    executor.run(&mut parent, &payload);

    assert_eq!(a.calls.load(Ordering::SeqCst), 0);
    assert_eq!(b.calls.load(Ordering::SeqCst), 0);
  }

  /// Records the modifier of every dispatched operation.
  struct ModifierRecorder {
    seen: std::sync::Mutex<Vec<Vec<u8>>>,
  }

  impl Module for ModifierRecorder {
    fn id(&self) -> u64 {
      components::module_id("recorder")
    }
    fn name(&self) -> &str {
      "recorder"
    }
    fn digest(&self, op: &Digest) -> Option<Buffer> {
      self.seen.lock().unwrap().push(op.modifier.as_slice().to_vec());
      Some(Buffer::from(&[0u8; 4][..]))
    }
  }

  #[test]
  fn adjacent_same_module_entries_get_distinct_modifiers() {
    let recorder = Arc::new(ModifierRecorder {
      seen: std::sync::Mutex::new(Vec::new()),
    });
    let mut modules = ModuleRegistry::new();
    modules.insert(recorder.id(), Arc::clone(&recorder) as Arc<dyn Module>);
    let options = Options::new();
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);

    // Two entries, both with empty modifiers, both on the recorder.
    let mut stream = Vec::new();
    stream.extend(0u32.to_le_bytes());
    stream.extend(recorder.id().to_le_bytes());
    stream.push(1); // continue
    stream.extend(0u32.to_le_bytes());
    stream.extend(recorder.id().to_le_bytes());
    stream.push(0); // stop

    let payload = digest_payload(b"x", DigestKind::SHA256);
    let mut parent = Datasource::new(&stream);
    executor.run(&mut parent, &payload);

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_ne!(seen[0], seen[1]);
    assert_eq!(seen[1].len(), 512);
  }

  #[test]
  fn nondeterministic_first_op_suppresses_comparison() {
    use components::ops::EccGenerateKeyPair;
    use components::results::{EccKeyPair, EccPoint};

    struct RandomKeys {
      name: String,
      seed: u8,
    }

    impl Module for RandomKeys {
      fn id(&self) -> u64 {
        components::module_id(&self.name)
      }
      fn name(&self) -> &str {
        &self.name
      }
      fn ecc_generate_keypair(&self, _op: &EccGenerateKeyPair) -> Option<EccKeyPair> {
        // Deliberately different per module.
        Some(EccKeyPair {
          private: Bignum::from(if self.seed == 0 { "1" } else { "2" }),
          public: EccPoint::default(),
        })
      }
    }

    let a: Arc<dyn Module> = Arc::new(RandomKeys {
      name: String::from("rk-a"),
      seed: 0,
    });
    let b: Arc<dyn Module> = Arc::new(RandomKeys {
      name: String::from("rk-b"),
      seed: 1,
    });
    let mut modules = ModuleRegistry::new();
    modules.insert(a.id(), Arc::clone(&a));
    modules.insert(b.id(), Arc::clone(&b));
    let options = Options::new();
    let executor: Executor<'_, EccGenerateKeyPair> = Executor::new(&modules, &options);

    let payload = components::ids::CurveKind::SECP256K1.id().to_le_bytes().to_vec();
    let stream = single_entry_stream(a.id());
    let mut parent = Datasource::new(&stream);

    // Differing results, but keypair generation is never compared; if the
    // comparator ran anyway this would abort the test process.
    executor.run(&mut parent, &payload);
  }

  #[test]
  fn modular_variant_pins_the_modulus() {
    use components::ops::BignumCalc;

    struct CaptureModulo {
      seen: std::sync::Mutex<Option<String>>,
    }

    impl Module for CaptureModulo {
      fn id(&self) -> u64 {
        components::module_id("capture")
      }
      fn name(&self) -> &str {
        "capture"
      }
      fn supports_modular_bignum_calc(&self) -> bool {
        true
      }
      fn bignum_calc(&self, op: &BignumCalc) -> Option<Bignum> {
        *self.seen.lock().unwrap() = op.modulo.as_ref().map(Bignum::to_trimmed_string);
        Some(Bignum::from("0"))
      }
    }

    let capture = Arc::new(CaptureModulo {
      seen: std::sync::Mutex::new(None),
    });
    let mut modules = ModuleRegistry::new();
    modules.insert(capture.id(), Arc::clone(&capture) as Arc<dyn Module>);
    let options = Options::new();
    let executor = Executor::bignum_calc_mod_bls12_381_r(&modules, &options);

    let mut payload = components::ids::CalcOp::ADD.id().to_le_bytes().to_vec();
    for operand in ["1", "2", "", ""] {
      payload.extend((operand.len() as u32).to_le_bytes());
      payload.extend(operand.as_bytes());
    }
    let stream = single_entry_stream(capture.id());
    let mut parent = Datasource::new(&stream);
    executor.run(&mut parent, &payload);

    assert_eq!(capture.seen.lock().unwrap().as_deref(), Some(config::BLS12_381_R));
  }

  #[test]
  fn modulo_without_capability_yields_absent() {
    use components::ops::BignumCalc;

    struct NonModular {
      calls: AtomicUsize,
    }

    impl Module for NonModular {
      fn id(&self) -> u64 {
        components::module_id("nonmodular")
      }
      fn name(&self) -> &str {
        "nonmodular"
      }
      fn bignum_calc(&self, _op: &BignumCalc) -> Option<Bignum> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(Bignum::from("0"))
      }
    }

    let plain = Arc::new(NonModular {
      calls: AtomicUsize::new(0),
    });
    let mut modules = ModuleRegistry::new();
    modules.insert(plain.id(), Arc::clone(&plain) as Arc<dyn Module>);
    let options = Options::new();
    let executor = Executor::bignum_calc_mod_2exp256(&modules, &options);

    let mut payload = components::ids::CalcOp::ADD.id().to_le_bytes().to_vec();
    for operand in ["1", "2", "", ""] {
      payload.extend((operand.len() as u32).to_le_bytes());
      payload.extend(operand.as_bytes());
    }
    let stream = single_entry_stream(plain.id());
    let mut parent = Datasource::new(&stream);
    executor.run(&mut parent, &payload);

    assert_eq!(plain.calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn force_module_overrides_the_stream() {
    let a = TintModule::new("force-a", 0);
    let b = TintModule::new("force-b", 0);
    let modules = registry(&[Arc::clone(&a), Arc::clone(&b)]);
    let options = Options::new().with_force_module(b.id()).disable_module(a.id());
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);

    let payload = digest_payload(b"x", DigestKind::SHA256);
    // Stream names module a, but the force option reroutes to b and the
    // deny-set keeps a out of the broadcast fill.
    let stream = single_entry_stream(a.id());
    let mut parent = Datasource::new(&stream);
    executor.run(&mut parent, &payload);

    assert_eq!(a.calls.load(Ordering::SeqCst), 0);
    assert_eq!(b.calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn operation_id_is_the_name_hash() {
    let modules = ModuleRegistry::new();
    let options = Options::new();
    let executor: Executor<'_, Digest> = Executor::new(&modules, &options);
    assert_eq!(executor.operation_id(), ids::id_from_name("Digest"));
  }
}
