//! Policies for the elliptic-curve operations.

use components::{
  ids::CurveKind,
  ops::{
    EccGenerateKeyPair, EccPrivateToPublic, EccValidatePubkey, EcdhDerive, EcdsaSign, EcdsaVerify, EciesDecrypt,
    EciesEncrypt,
  },
  results::{Ciphertext, EccKeyPair, EccPoint, EcdsaSignature},
  Buffer, Modifier, Operation as _,
};
use datasource::Datasource;

use super::{key_material_in_bounds, Dispatch};
use crate::{
  fault,
  module::{Module, ModuleRegistry},
  options::Options,
  pool::{
    set_bignum, CurveEcdsaSignature, CurveKeypair, CurvePrivkey, POOL_CURVE_ECDSA_SIGNATURE, POOL_CURVE_KEYPAIR,
    POOL_CURVE_PRIVKEY,
  },
};

impl Dispatch for EccPrivateToPublic {
  type Output = EccPoint;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<EccPoint> {
    if !Options::have(&options.curves, self.curve_type.id()) {
      return None;
    }
    if !key_material_in_bounds(&self.private) {
      return None;
    }

    module.ecc_private_to_public(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &EccPoint, _options: &Options) {
    let curve = self.curve_type.id();
    let private = self.private.to_trimmed_string();
    let pub_x = output.x.to_trimmed_string();
    let pub_y = output.y.to_trimmed_string();

    POOL_CURVE_PRIVKEY.set(CurvePrivkey {
      curve,
      private: private.clone(),
    });
    POOL_CURVE_KEYPAIR.set(CurveKeypair {
      curve,
      private,
      pub_x: pub_x.clone(),
      pub_y: pub_y.clone(),
    });
    set_bignum(pub_x);
    set_bignum(pub_y);
  }
}

impl Dispatch for EccValidatePubkey {
  type Output = bool;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<bool> {
    if !Options::have(&options.curves, self.curve_type.id()) {
      return None;
    }

    module.ecc_validate_pubkey(self)
  }
}

impl Dispatch for EccGenerateKeyPair {
  type Output = EccKeyPair;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<EccKeyPair> {
    if !Options::have(&options.curves, self.curve_type.id()) {
      return None;
    }

    module.ecc_generate_keypair(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &EccKeyPair, _options: &Options) {
    let curve = self.curve_type.id();
    let private = output.private.to_trimmed_string();

    POOL_CURVE_PRIVKEY.set(CurvePrivkey {
      curve,
      private: private.clone(),
    });
    POOL_CURVE_KEYPAIR.set(CurveKeypair {
      curve,
      private,
      pub_x: output.public.x.to_trimmed_string(),
      pub_y: output.public.y.to_trimmed_string(),
    });
  }

  fn dont_compare(&self) -> bool {
    // Fresh keypairs are nondeterministic by construction.
    true
  }
}

impl Dispatch for EcdsaSign {
  type Output = EcdsaSignature;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<EcdsaSignature> {
    if !Options::have(&options.curves, self.curve_type.id()) {
      return None;
    }
    if !Options::have(&options.digests, self.digest_type.id()) {
      return None;
    }
    if !key_material_in_bounds(&self.private) {
      return None;
    }

    module.ecdsa_sign(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &EcdsaSignature, _options: &Options) {
    let pub_x = output.public.x.to_trimmed_string();
    let pub_y = output.public.y.to_trimmed_string();
    let sig_r = output.r.to_trimmed_string();
    let sig_s = output.s.to_trimmed_string();

    POOL_CURVE_ECDSA_SIGNATURE.set(CurveEcdsaSignature {
      curve: self.curve_type.id(),
      cleartext: self.cleartext.to_hex(),
      pub_x: pub_x.clone(),
      pub_y: pub_y.clone(),
      sig_r: sig_r.clone(),
      sig_s: sig_s.clone(),
    });

    set_bignum(pub_x);
    set_bignum(pub_y);
    set_bignum(sig_r);
    set_bignum(sig_s);
  }

  fn dont_compare(&self) -> bool {
    // A random nonce makes the signature different per call on every curve
    // whose scheme is not deterministic by definition.
    self.curve_type != CurveKind::ED25519 && self.curve_type != CurveKind::ED448 && self.use_random_nonce()
  }

  fn sanity_check(&self, module: &dyn Module, output: &EcdsaSignature) {
    if output.r.to_trimmed_string() == "0" || output.s.to_trimmed_string() == "0" {
      fault::fatal(
        vec![module.name().to_string()],
        Self::NAME,
        &self.algorithm(),
        "invalid signature",
      );
    }
  }
}

impl Dispatch for EcdsaVerify {
  type Output = bool;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<bool> {
    if !Options::have(&options.curves, self.curve_type.id()) {
      return None;
    }
    if !Options::have(&options.digests, self.digest_type.id()) {
      return None;
    }

    // Intentionally no size constraint on the public key or signature.
    // Verifiers process untrusted inputs in the wild; if a large value
    // causes a timeout or worse, that needs attention rather than a guard.
    module.ecdsa_verify(self)
  }
}

impl Dispatch for EcdhDerive {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Buffer> {
    if !Options::have(&options.curves, self.curve_type.id()) {
      return None;
    }

    module.ecdh_derive(self)
  }

  fn refine(self, parent: &mut Datasource<'_>, modules: &ModuleRegistry, options: &Options) -> Self {
    match synthesize(&self, parent, modules, options) {
      Some(op) => op,
      None => self,
    }
  }
}

/// Optionally replace a decoded derive operation with one built from two
/// fresh private-to-public results, so the public keys are guaranteed to be
/// valid curve points. Any failure along the chain keeps the original.
fn synthesize(
  original: &EcdhDerive,
  parent: &mut Datasource<'_>,
  modules: &ModuleRegistry,
  options: &Options,
) -> Option<EcdhDerive> {
  if !parent.get_bool().ok()? {
    return None;
  }

  let module = crate::engine::decode_module(parent, modules, options).ok()??;

  let modifier1 = Modifier::new(parent.get_data(0).ok()?);
  let op1 = EccPrivateToPublic::read(parent, modifier1).ok()?;
  let modifier2 = Modifier::new(parent.get_data(0).ok()?);
  let op2 = EccPrivateToPublic::read(parent, modifier2).ok()?;

  if op1.curve_type != op2.curve_type {
    return None;
  }

  let pub1 = module.ecc_private_to_public(&op1)?;
  let pub2 = module.ecc_private_to_public(&op2)?;

  Some(EcdhDerive::synthesized(
    original.modifier.clone(),
    op1.curve_type,
    pub1,
    pub2,
  ))
}

impl Dispatch for EciesEncrypt {
  type Output = Ciphertext;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Ciphertext> {
    if !Options::have(&options.curves, self.curve_type.id()) {
      return None;
    }

    module.ecies_encrypt(self)
  }
}

impl Dispatch for EciesDecrypt {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Buffer> {
    if !Options::have(&options.curves, self.curve_type.id()) {
      return None;
    }

    module.ecies_decrypt(self)
  }
}
