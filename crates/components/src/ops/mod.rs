//! Typed operations: one struct per primitive the engine can dispatch.
//!
//! Every operation is built from the byte stream by a deterministic
//! constructor (`read`), carries an opaque [`Modifier`], and projects itself
//! for diagnostics (`render`) and the JSON result log (`to_json`). The
//! per-variant `MAX_OPERATIONS` constant bounds how many instances a single
//! fuzzer invocation may dispatch, which is the engine's timeout guard.

use alloc::{format, string::String};
use core::fmt::Debug;

use datasource::{Datasource, OutOfData};
use serde_json::Value;

use crate::primitive::Modifier;

mod bignum;
mod bls;
mod cipher;
mod dh;
mod ecc;
mod kdf;
mod mac;
mod misc;

pub use bignum::BignumCalc;
pub use bls::{
  BlsCompressG1, BlsCompressG2, BlsDecompressG1, BlsDecompressG2, BlsGenerateKeyPair, BlsHashToG1, BlsHashToG2,
  BlsIsG1OnCurve, BlsIsG2OnCurve, BlsPairing, BlsPrivateToPublic, BlsSign, BlsVerify,
};
pub use cipher::{SymmetricDecrypt, SymmetricEncrypt};
pub use dh::{DhDerive, DhGenerateKeyPair};
pub use ecc::{
  EccGenerateKeyPair, EccPrivateToPublic, EccValidatePubkey, EcdhDerive, EcdsaSign, EcdsaVerify, EciesDecrypt,
  EciesEncrypt,
};
pub use kdf::{
  KdfArgon2, KdfBcrypt, KdfHkdf, KdfMechanism, KdfPbkdf, KdfPbkdf1, KdfPbkdf2, KdfScrypt, KdfSp800_108, KdfSsh,
  KdfTls1Prf, KdfX963,
};
pub use mac::{Cmac, Digest, Hmac};
pub use misc::{Misc, Sr25519Verify};

/// Cap on requested output-buffer sizes (ciphertext, derived keys).
pub(crate) const MAX_OUTPUT_SIZE: u64 = 1 << 20;

/// Cap on derived-key sizes for KDF operations.
pub(crate) const MAX_KEY_SIZE: u64 = 1024;

/// Cap on KDF iteration counts.
pub(crate) const MAX_ITERATIONS: u64 = 1 << 20;

/// Expands to the two modifier accessors every operation implements the
/// same way. Introduced once the field-for-field repetition across the KDF,
/// curve, and BLS variants got out of hand.
macro_rules! modifier_accessors {
  () => {
    fn modifier(&self) -> &Modifier {
      &self.modifier
    }

    fn modifier_mut(&mut self) -> &mut Modifier {
      &mut self.modifier
    }
  };
}
pub(crate) use modifier_accessors;

/// A typed operation the engine can derive, dispatch, and compare.
pub trait Operation: Sized + Clone + Debug {
  /// Variant tag, e.g. `"Digest"`.
  const NAME: &'static str;

  /// Per-invocation repetition cap (timeout guard).
  const MAX_OPERATIONS: usize;

  /// Build one operation from a deterministic prefix of the byte stream.
  fn read(ds: &mut Datasource<'_>, modifier: Modifier) -> Result<Self, OutOfData>;

  /// The nondeterminism seed.
  fn modifier(&self) -> &Modifier;

  /// Mutable access for the engine's adjacent-dispatch perturbation.
  fn modifier_mut(&mut self) -> &mut Modifier;

  /// The primary algorithm string, e.g. `"SHA-256"`.
  fn algorithm(&self) -> String;

  /// JSON projection for the append-only result log.
  fn to_json(&self) -> Value;

  /// Human-readable rendering for diagnostics.
  fn render(&self) -> String {
    format!("operation name: {}\n{:#}", Self::NAME, self.to_json())
  }
}
