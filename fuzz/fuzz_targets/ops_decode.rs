//! Operation constructors must never panic, whatever the payload: they
//! either decode or report an under-run.

#![no_main]

use cryptodiff::{ops, Datasource, Modifier, Operation};
use libfuzzer_sys::fuzz_target;

fn decode<O: Operation>(data: &[u8]) {
  let mut ds = Datasource::new(data);
  if let Ok(op) = O::read(&mut ds, Modifier::empty()) {
    // Projections must hold for anything that decodes.
    let _ = op.algorithm();
    let _ = op.to_json();
    let _ = op.render();
  }
}

fuzz_target!(|data: &[u8]| {
  decode::<ops::Digest>(data);
  decode::<ops::Hmac>(data);
  decode::<ops::Cmac>(data);
  decode::<ops::SymmetricEncrypt>(data);
  decode::<ops::SymmetricDecrypt>(data);
  decode::<ops::KdfScrypt>(data);
  decode::<ops::KdfHkdf>(data);
  decode::<ops::KdfTls1Prf>(data);
  decode::<ops::KdfPbkdf>(data);
  decode::<ops::KdfPbkdf1>(data);
  decode::<ops::KdfPbkdf2>(data);
  decode::<ops::KdfArgon2>(data);
  decode::<ops::KdfSsh>(data);
  decode::<ops::KdfX963>(data);
  decode::<ops::KdfBcrypt>(data);
  decode::<ops::KdfSp800_108>(data);
  decode::<ops::EccPrivateToPublic>(data);
  decode::<ops::EccValidatePubkey>(data);
  decode::<ops::EccGenerateKeyPair>(data);
  decode::<ops::EcdsaSign>(data);
  decode::<ops::EcdsaVerify>(data);
  decode::<ops::EcdhDerive>(data);
  decode::<ops::EciesEncrypt>(data);
  decode::<ops::EciesDecrypt>(data);
  decode::<ops::DhDerive>(data);
  decode::<ops::DhGenerateKeyPair>(data);
  decode::<ops::BignumCalc>(data);
  decode::<ops::BlsPrivateToPublic>(data);
  decode::<ops::BlsSign>(data);
  decode::<ops::BlsVerify>(data);
  decode::<ops::BlsPairing>(data);
  decode::<ops::BlsHashToG1>(data);
  decode::<ops::BlsHashToG2>(data);
  decode::<ops::BlsIsG1OnCurve>(data);
  decode::<ops::BlsIsG2OnCurve>(data);
  decode::<ops::BlsGenerateKeyPair>(data);
  decode::<ops::BlsDecompressG1>(data);
  decode::<ops::BlsCompressG1>(data);
  decode::<ops::BlsDecompressG2>(data);
  decode::<ops::BlsCompressG2>(data);
  decode::<ops::Sr25519Verify>(data);
  decode::<ops::Misc>(data);
});
