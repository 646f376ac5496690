//! The per-operation policy table.
//!
//! [`Dispatch`] is implemented once per operation variant and attaches four
//! policies to it:
//!
//! - **`call_module`** — the guard: checks allow-sets and size caps, then
//!   invokes the backend method. A violated guard yields `None` without the
//!   backend ever being called.
//! - **`postprocess`** — runs after every present result: round-trip
//!   checks, corpus-pool feedback.
//! - **`dont_compare`** — marks operations whose results are legitimately
//!   nondeterministic and must not be differentially compared.
//! - **`refine`** — the derivation hook: lets a variant replace the decoded
//!   operation with a synthesized one (ECDH), or an executor pin fields on
//!   it (modular bignum calc).
//!
//! All policies are pure functions of the operation, the options snapshot,
//! and (for `postprocess`) the result — aside from pool side effects.

use components::{primitive::Bignum, results::OpOutput, Operation};
use datasource::Datasource;

use crate::{config, module::Module, options::Options};

mod bignum;
mod bls;
mod cipher;
mod dh;
mod ecc;
mod kdf;
mod mac;
mod misc;

/// Policy record tying an operation variant to its result type.
pub trait Dispatch: Operation {
  /// The paired result type.
  type Output: OpOutput;

  /// Guard plus backend invocation. `None` means the guard rejected the
  /// call or the backend declined; the two are indistinguishable on
  /// purpose.
  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Self::Output>;

  /// Post-result hook, invoked for present results only. The engine has
  /// already probed every output byte by the time this runs.
  fn postprocess(&self, module: &dyn Module, output: &Self::Output, options: &Options) {
    let _ = (module, output, options);
  }

  /// Whether results of this operation must not be compared.
  fn dont_compare(&self) -> bool {
    false
  }

  /// Derivation hook: optionally replace the decoded operation using more
  /// bytes from the parent stream. Any failure must fall back to the
  /// original operation.
  #[must_use]
  fn refine(
    self,
    parent: &mut Datasource<'_>,
    modules: &crate::module::ModuleRegistry,
    options: &Options,
  ) -> Self {
    let _ = (parent, modules, options);
    self
  }

  /// Semantic sanity check, run per result unless `disable_tests` is set.
  /// May abort the process; must not return an error.
  fn sanity_check(&self, module: &dyn Module, output: &Self::Output) {
    let _ = (module, output);
  }
}

/// Key-material bound shared by the private-to-public and signing guards:
/// the trimmed decimal form must be non-empty and at most 4096 bytes.
pub(crate) fn key_material_in_bounds(private: &Bignum) -> bool {
  let len = private.to_trimmed_string().len();
  len >= 1 && len <= config::MAX_KEY_MATERIAL_SIZE
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn key_material_bounds() {
    // Trimming never yields an empty string, so only the upper bound can
    // reject in practice.
    assert!(key_material_in_bounds(&Bignum::from("1")));
    assert!(key_material_in_bounds(&Bignum::from("0")));
    assert!(key_material_in_bounds(&Bignum::from("")));

    let max = "9".repeat(config::MAX_KEY_MATERIAL_SIZE);
    assert!(key_material_in_bounds(&Bignum::new(max)));

    let oversized = "9".repeat(config::MAX_KEY_MATERIAL_SIZE + 1);
    assert!(!key_material_in_bounds(&Bignum::new(oversized)));
  }
}
