//! Policies for the BLS12-381 operations.
//!
//! BLS backends accept any curve ID the stream names (there is only one
//! curve family in practice), so no allow-set gates apply here; guards are
//! size caps only, and most of the work is corpus feedback.

use components::{
  ops::{
    BlsCompressG1, BlsCompressG2, BlsDecompressG1, BlsDecompressG2, BlsGenerateKeyPair, BlsHashToG1, BlsHashToG2,
    BlsIsG1OnCurve, BlsIsG2OnCurve, BlsPairing, BlsPrivateToPublic, BlsSign, BlsVerify,
  },
  results::{BlsKeyPair, BlsSignature, G1, G2},
  Bignum,
};

use super::{key_material_in_bounds, Dispatch};
use crate::{
  config::MAX_BIGNUM_SIZE,
  module::Module,
  options::Options,
  pool::{set_bignum, CurveBlsG1, CurveBlsG2, CurveBlsSignature, POOL_CURVE_BLS_G1, POOL_CURVE_BLS_G2,
    POOL_CURVE_BLS_SIGNATURE},
};

fn pool_g1(curve: u64, point: &G1) {
  let x = point.x.to_trimmed_string();
  let y = point.y.to_trimmed_string();
  POOL_CURVE_BLS_G1.set(CurveBlsG1 {
    curve,
    x: x.clone(),
    y: y.clone(),
  });
  set_bignum(x);
  set_bignum(y);
}

fn pool_g2(curve: u64, point: &G2) {
  let v = point.v.to_trimmed_string();
  let w = point.w.to_trimmed_string();
  let x = point.x.to_trimmed_string();
  let y = point.y.to_trimmed_string();
  POOL_CURVE_BLS_G2.set(CurveBlsG2 {
    curve,
    v: v.clone(),
    w: w.clone(),
    x: x.clone(),
    y: y.clone(),
  });
  set_bignum(v);
  set_bignum(w);
  set_bignum(x);
  set_bignum(y);
}

impl Dispatch for BlsPrivateToPublic {
  type Output = G1;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<G1> {
    if !key_material_in_bounds(&self.private) {
      return None;
    }

    module.bls_private_to_public(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &G1, _options: &Options) {
    pool_g1(self.curve_type.id(), output);
  }
}

impl Dispatch for BlsSign {
  type Output = BlsSignature;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<BlsSignature> {
    if !key_material_in_bounds(&self.private) {
      return None;
    }

    module.bls_sign(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &BlsSignature, _options: &Options) {
    let curve = self.curve_type.id();
    let empty = String::new();
    let coord = |bn: &Bignum| bn.to_trimmed_string();

    pool_g1(curve, &output.public);
    pool_g2(curve, &output.signature);

    POOL_CURVE_BLS_SIGNATURE.set(CurveBlsSignature {
      curve,
      hash_or_point: self.hash_or_point,
      point_v: if self.hash_or_point { coord(&self.point.v) } else { empty.clone() },
      point_w: if self.hash_or_point { coord(&self.point.w) } else { empty.clone() },
      point_x: if self.hash_or_point { coord(&self.point.x) } else { empty.clone() },
      point_y: if self.hash_or_point { coord(&self.point.y) } else { empty.clone() },
      cleartext: if self.hash_or_point { self.cleartext.to_hex() } else { empty },
      dest: self.dest.to_hex(),
      aug: self.aug.to_hex(),
      pub_x: coord(&output.public.x),
      pub_y: coord(&output.public.y),
      sig_v: coord(&output.signature.v),
      sig_w: coord(&output.signature.w),
      sig_x: coord(&output.signature.x),
      sig_y: coord(&output.signature.y),
    });
  }
}

impl Dispatch for BlsVerify {
  type Output = bool;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<bool> {
    // Verifiers should survive arbitrarily large untrusted inputs; the
    // size guard is opt-in for hosts that cannot afford the worst case.
    #[cfg(feature = "bls-verify-size-guard")]
    {
      let sizes = [
        self.public.x.to_trimmed_string().len(),
        self.public.y.to_trimmed_string().len(),
        self.signature.v.to_trimmed_string().len(),
        self.signature.w.to_trimmed_string().len(),
        self.signature.x.to_trimmed_string().len(),
        self.signature.y.to_trimmed_string().len(),
      ];
      if sizes.iter().any(|&len| len == 0 || len > crate::config::MAX_KEY_MATERIAL_SIZE) {
        return None;
      }
    }

    module.bls_verify(self)
  }
}

impl Dispatch for BlsPairing {
  type Output = bool;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<bool> {
    module.bls_pairing(self)
  }
}

impl Dispatch for BlsHashToG1 {
  type Output = G1;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<G1> {
    module.bls_hash_to_g1(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &G1, _options: &Options) {
    pool_g1(self.curve_type.id(), output);
  }
}

impl Dispatch for BlsHashToG2 {
  type Output = G2;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<G2> {
    module.bls_hash_to_g2(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &G2, _options: &Options) {
    pool_g2(self.curve_type.id(), output);
  }
}

impl Dispatch for BlsIsG1OnCurve {
  type Output = bool;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<bool> {
    if self.g1.x.len() > MAX_BIGNUM_SIZE || self.g1.y.len() > MAX_BIGNUM_SIZE {
      return None;
    }

    module.bls_is_g1_on_curve(self)
  }
}

impl Dispatch for BlsIsG2OnCurve {
  type Output = bool;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<bool> {
    if self.g2.coordinates().iter().any(|coord| coord.len() > MAX_BIGNUM_SIZE) {
      return None;
    }

    module.bls_is_g2_on_curve(self)
  }
}

impl Dispatch for BlsGenerateKeyPair {
  type Output = BlsKeyPair;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<BlsKeyPair> {
    module.bls_generate_keypair(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &BlsKeyPair, _options: &Options) {
    pool_g1(self.curve_type.id(), &output.public);
    set_bignum(output.private.to_trimmed_string());
  }
}

impl Dispatch for BlsDecompressG1 {
  type Output = G1;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<G1> {
    module.bls_decompress_g1(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &G1, _options: &Options) {
    pool_g1(self.curve_type.id(), output);
  }
}

impl Dispatch for BlsCompressG1 {
  type Output = Bignum;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<Bignum> {
    module.bls_compress_g1(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &Bignum, _options: &Options) {
    set_bignum(output.to_trimmed_string());
  }
}

impl Dispatch for BlsDecompressG2 {
  type Output = G2;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<G2> {
    module.bls_decompress_g2(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &G2, _options: &Options) {
    pool_g2(self.curve_type.id(), output);
  }
}

impl Dispatch for BlsCompressG2 {
  type Output = G1;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<G1> {
    module.bls_compress_g2(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &G1, _options: &Options) {
    pool_g1(self.curve_type.id(), output);
  }
}

#[cfg(test)]
mod tests {
  use components::{ids::CurveKind, Buffer, Modifier};

  use super::*;

  struct BlsModule;

  impl Module for BlsModule {
    fn id(&self) -> u64 {
      components::module_id("bls")
    }
    fn name(&self) -> &str {
      "bls"
    }
    fn bls_private_to_public(&self, _op: &BlsPrivateToPublic) -> Option<G1> {
      Some(G1 {
        x: Bignum::from("314"),
        y: Bignum::from("159"),
      })
    }
    fn bls_is_g1_on_curve(&self, _op: &BlsIsG1OnCurve) -> Option<bool> {
      Some(true)
    }
    fn bls_verify(&self, _op: &BlsVerify) -> Option<bool> {
      Some(true)
    }
  }

  #[test]
  fn private_to_public_guards_key_material() {
    let mut op = BlsPrivateToPublic {
      modifier: Modifier::empty(),
      curve_type: CurveKind::BLS12_381,
      private: Bignum::from("3"),
    };
    assert!(op.call_module(&BlsModule, &Options::new()).is_some());

    op.private = Bignum::new("7".repeat(crate::config::MAX_KEY_MATERIAL_SIZE + 1));
    assert!(op.call_module(&BlsModule, &Options::new()).is_none());
  }

  #[test]
  fn private_to_public_feeds_g1_pool() {
    let op = BlsPrivateToPublic {
      modifier: Modifier::empty(),
      curve_type: CurveKind::BLS12_381,
      private: Bignum::from("3"),
    };
    let output = BlsModule.bls_private_to_public(&op).unwrap();
    op.postprocess(&BlsModule, &output, &Options::new());

    assert!(POOL_CURVE_BLS_G1.contains(&CurveBlsG1 {
      curve: CurveKind::BLS12_381.id(),
      x: String::from("314"),
      y: String::from("159"),
    }));
    assert!(crate::pool::POOL_BIGNUM.contains(&String::from("314")));
  }

  #[test]
  fn is_g1_on_curve_size_cap() {
    let mut op = BlsIsG1OnCurve {
      modifier: Modifier::empty(),
      curve_type: CurveKind::BLS12_381,
      g1: G1 {
        x: Bignum::from("1"),
        y: Bignum::from("2"),
      },
    };
    assert!(op.call_module(&BlsModule, &Options::new()).is_some());

    op.g1.y = Bignum::new("3".repeat(MAX_BIGNUM_SIZE + 1));
    assert!(op.call_module(&BlsModule, &Options::new()).is_none());
  }

  #[test]
  fn verify_dispatches_without_size_guard_by_default() {
    let op = BlsVerify {
      modifier: Modifier::empty(),
      curve_type: CurveKind::BLS12_381,
      public: G1::default(),
      signature: G2::default(),
      cleartext: Buffer::default(),
      dest: Buffer::default(),
    };
    // Default (empty) coordinates trim to "0"; the shipped behavior still
    // dispatches them.
    #[cfg(not(feature = "bls-verify-size-guard"))]
    assert!(op.call_module(&BlsModule, &Options::new()).is_some());
    #[cfg(feature = "bls-verify-size-guard")]
    assert!(op.call_module(&BlsModule, &Options::new()).is_some());
  }

  #[test]
  fn sign_pools_point_fields_only_in_hash_mode() {
    let op = BlsSign {
      modifier: Modifier::empty(),
      curve_type: CurveKind::BLS12_381,
      private: Bignum::from("5"),
      hash_or_point: false,
      point: G2 {
        v: Bignum::from("1"),
        w: Bignum::from("2"),
        x: Bignum::from("3"),
        y: Bignum::from("4"),
      },
      cleartext: Buffer::from(&b"m"[..]),
      dest: Buffer::from(&b"d"[..]),
      aug: Buffer::default(),
    };
    let output = BlsSignature {
      signature: G2 {
        v: Bignum::from("11"),
        w: Bignum::from("22"),
        x: Bignum::from("33"),
        y: Bignum::from("44"),
      },
      public: G1 {
        x: Bignum::from("55"),
        y: Bignum::from("66"),
      },
    };
    op.postprocess(&BlsModule, &output, &Options::new());

    // In point mode the message-side fields are blanked in the pool key.
    assert!(POOL_CURVE_BLS_SIGNATURE.contains(&CurveBlsSignature {
      curve: CurveKind::BLS12_381.id(),
      hash_or_point: false,
      point_v: String::new(),
      point_w: String::new(),
      point_x: String::new(),
      point_y: String::new(),
      cleartext: String::new(),
      dest: String::from("64"),
      aug: String::new(),
      pub_x: String::from("55"),
      pub_y: String::from("66"),
      sig_v: String::from("11"),
      sig_w: String::from("22"),
      sig_x: String::from("33"),
      sig_y: String::from("44"),
    }));
  }
}
