//! Drive the full pipeline with arbitrary bytes against two agreeing
//! backends. Any panic, and any differential abort, is a bug in the engine
//! itself: identical backends cannot legitimately disagree.

#![no_main]

use std::sync::Arc;

use cryptodiff::{
  ops::{BignumCalc, Digest, EcdhDerive, SymmetricDecrypt, SymmetricEncrypt},
  results::{Ciphertext, EccPoint},
  Bignum, Buffer, Datasource, Executor, Module, ModuleRegistry, Options,
};
use libfuzzer_sys::fuzz_target;

/// Deterministic toy backend: every answer is a pure function of the
/// operation, so two instances always agree.
struct Mirror {
  name: String,
}

impl Mirror {
  fn pair() -> ModuleRegistry {
    let a: Arc<dyn Module> = Arc::new(Mirror {
      name: String::from("mirror-a"),
    });
    let b: Arc<dyn Module> = Arc::new(Mirror {
      name: String::from("mirror-b"),
    });
    [a, b].into_iter().map(|m| (m.id(), m)).collect()
  }
}

impl Module for Mirror {
  fn id(&self) -> u64 {
    cryptodiff::module_id(&self.name)
  }
  fn name(&self) -> &str {
    &self.name
  }
  fn supports_modular_bignum_calc(&self) -> bool {
    true
  }
  fn digest(&self, op: &Digest) -> Option<Buffer> {
    let folded = op.cleartext.as_slice().iter().fold(0x17u8, |acc, &b| acc.rotate_left(3) ^ b);
    Some(Buffer::from(&[folded; 16][..]))
  }
  fn symmetric_encrypt(&self, op: &SymmetricEncrypt) -> Option<Ciphertext> {
    let ct: Vec<u8> = op.cleartext.as_slice().iter().map(|b| b ^ 0x5a).collect();
    Some(Ciphertext {
      ciphertext: Buffer::from(&ct[..]),
      tag: op.tag_size.map(|n| Buffer::from(&vec![0u8; (n % 64) as usize][..])),
    })
  }
  fn symmetric_decrypt(&self, op: &SymmetricDecrypt) -> Option<Buffer> {
    let pt: Vec<u8> = op.ciphertext.as_slice().iter().map(|b| b ^ 0x5a).collect();
    Some(Buffer::from(&pt[..]))
  }
  fn bignum_calc(&self, op: &BignumCalc) -> Option<Bignum> {
    let digits = op.bn0.len() + op.bn1.len() + op.bn2.len() + op.bn3.len();
    Some(Bignum::new(digits.to_string()))
  }
  fn ecdh_derive(&self, _op: &EcdhDerive) -> Option<Buffer> {
    // Constant secret: the synthesis hook may legitimately hand different
    // point pairs to different batch entries, and this target only hunts
    // engine bugs, not fake-curve arithmetic.
    Some(Buffer::from(&[0x42u8; 32][..]))
  }
  fn ecc_private_to_public(&self, op: &cryptodiff::ops::EccPrivateToPublic) -> Option<EccPoint> {
    Some(EccPoint {
      x: Bignum::new(op.private.to_trimmed_string()),
      y: Bignum::new(op.private.to_trimmed_string()),
    })
  }
}

fuzz_target!(|data: &[u8]| {
  let modules = Mirror::pair();
  let options = Options::new();

  let mut parent = Datasource::new(data);
  let Ok(selector) = parent.get_u8() else { return };
  let Ok(payload) = parent.get_data(0) else { return };

  match selector % 5 {
    0 => Executor::<Digest>::new(&modules, &options).run(&mut parent, &payload),
    1 => Executor::<SymmetricEncrypt>::new(&modules, &options).run(&mut parent, &payload),
    2 => Executor::<BignumCalc>::new(&modules, &options).run(&mut parent, &payload),
    3 => Executor::bignum_calc_mod_bls12_381_r(&modules, &options).run(&mut parent, &payload),
    _ => Executor::<EcdhDerive>::new(&modules, &options).run(&mut parent, &payload),
  }
});
