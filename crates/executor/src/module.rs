//! The backend contract.
//!
//! A module is one cryptographic library under test. It exposes one method
//! per operation variant; every method defaults to `None`, which means
//! "this backend declines" and is never an error. A backend that computes a
//! result returns `Some`, and from that point on the result participates in
//! differential comparison.
//!
//! Modules must be stateless as far as the engine can observe. They are
//! shared read-only behind `Arc` and must stay callable from multiple
//! threads.

use components::{
  ops::{
    BignumCalc, BlsCompressG1, BlsCompressG2, BlsDecompressG1, BlsDecompressG2, BlsGenerateKeyPair, BlsHashToG1,
    BlsHashToG2, BlsIsG1OnCurve, BlsIsG2OnCurve, BlsPairing, BlsPrivateToPublic, BlsSign, BlsVerify, Cmac, DhDerive,
    DhGenerateKeyPair, Digest, EccGenerateKeyPair, EccPrivateToPublic, EccValidatePubkey, EcdhDerive, EcdsaSign,
    EcdsaVerify, EciesDecrypt, EciesEncrypt, Hmac, KdfArgon2, KdfBcrypt, KdfHkdf, KdfPbkdf, KdfPbkdf1, KdfPbkdf2,
    KdfScrypt, KdfSp800_108, KdfSsh, KdfTls1Prf, KdfX963, Misc, SymmetricDecrypt, SymmetricEncrypt, Sr25519Verify,
  },
  results::{BlsKeyPair, BlsSignature, Ciphertext, DhKeyPair, EccKeyPair, EccPoint, EcdsaSignature, G1, G2},
  Bignum, Buffer,
};

macro_rules! module_op {
  ($(#[$meta:meta])* $method:ident, $op:ty, $out:ty) => {
    $(#[$meta])*
    fn $method(&self, op: &$op) -> Option<$out> {
      let _ = op;
      None
    }
  };
}

/// The process-wide set of loaded backends, keyed by module ID.
pub type ModuleRegistry = std::collections::BTreeMap<u64, std::sync::Arc<dyn Module>>;

/// One cryptographic backend, addressed by a stable 64-bit ID.
pub trait Module: Send + Sync {
  /// Stable backend ID; by convention [`components::module_id`] of `name`.
  fn id(&self) -> u64;

  /// Display name for diagnostics and crash signatures.
  fn name(&self) -> &str;

  /// Whether `bignum_calc` honors the `modulo` field.
  fn supports_modular_bignum_calc(&self) -> bool {
    false
  }

  module_op!(digest, Digest, Buffer);
  module_op!(hmac, Hmac, Buffer);
  module_op!(cmac, Cmac, Buffer);
  module_op!(symmetric_encrypt, SymmetricEncrypt, Ciphertext);
  module_op!(symmetric_decrypt, SymmetricDecrypt, Buffer);
  module_op!(kdf_scrypt, KdfScrypt, Buffer);
  module_op!(kdf_hkdf, KdfHkdf, Buffer);
  module_op!(kdf_tls1_prf, KdfTls1Prf, Buffer);
  module_op!(kdf_pbkdf, KdfPbkdf, Buffer);
  module_op!(kdf_pbkdf1, KdfPbkdf1, Buffer);
  module_op!(kdf_pbkdf2, KdfPbkdf2, Buffer);
  module_op!(kdf_argon2, KdfArgon2, Buffer);
  module_op!(kdf_ssh, KdfSsh, Buffer);
  module_op!(kdf_x963, KdfX963, Buffer);
  module_op!(kdf_bcrypt, KdfBcrypt, Buffer);
  module_op!(kdf_sp800_108, KdfSp800_108, Buffer);
  module_op!(ecc_private_to_public, EccPrivateToPublic, EccPoint);
  module_op!(ecc_validate_pubkey, EccValidatePubkey, bool);
  module_op!(ecc_generate_keypair, EccGenerateKeyPair, EccKeyPair);
  module_op!(ecdsa_sign, EcdsaSign, EcdsaSignature);
  module_op!(ecdsa_verify, EcdsaVerify, bool);
  module_op!(ecdh_derive, EcdhDerive, Buffer);
  module_op!(ecies_encrypt, EciesEncrypt, Ciphertext);
  module_op!(ecies_decrypt, EciesDecrypt, Buffer);
  module_op!(dh_derive, DhDerive, Bignum);
  module_op!(dh_generate_keypair, DhGenerateKeyPair, DhKeyPair);
  module_op!(bignum_calc, BignumCalc, Bignum);
  module_op!(bls_private_to_public, BlsPrivateToPublic, G1);
  module_op!(bls_sign, BlsSign, BlsSignature);
  module_op!(bls_verify, BlsVerify, bool);
  module_op!(bls_pairing, BlsPairing, bool);
  module_op!(bls_hash_to_g1, BlsHashToG1, G1);
  module_op!(bls_hash_to_g2, BlsHashToG2, G2);
  module_op!(bls_is_g1_on_curve, BlsIsG1OnCurve, bool);
  module_op!(bls_is_g2_on_curve, BlsIsG2OnCurve, bool);
  module_op!(bls_generate_keypair, BlsGenerateKeyPair, BlsKeyPair);
  module_op!(bls_decompress_g1, BlsDecompressG1, G1);
  module_op!(bls_compress_g1, BlsCompressG1, Bignum);
  module_op!(bls_decompress_g2, BlsDecompressG2, G2);
  module_op!(bls_compress_g2, BlsCompressG2, G1);
  module_op!(sr25519_verify, Sr25519Verify, bool);
  module_op!(misc, Misc, Buffer);
}
