//! Policies for symmetric encryption and decryption, including the
//! encrypt→decrypt round-trip check.

use components::{
  ids::CipherKind,
  module_id,
  ops::{SymmetricDecrypt, SymmetricEncrypt},
  results::Ciphertext,
  Buffer, Modifier, Operation as _,
};

use super::Dispatch;
use crate::{fault, module::Module, options::Options};

/// OpenSSL cannot decrypt its own OCB output in this configuration.
const OPENSSL_NO_ROUNDTRIP: [CipherKind; 2] = [CipherKind::AES_128_OCB, CipherKind::AES_256_OCB];

/// AEAD modes OpenSSL cannot decrypt without the tag it produced.
const OPENSSL_TAGGED_ONLY: [CipherKind; 12] = [
  CipherKind::AES_128_GCM,
  CipherKind::AES_192_GCM,
  CipherKind::AES_256_GCM,
  CipherKind::AES_128_CCM,
  CipherKind::AES_192_CCM,
  CipherKind::AES_256_CCM,
  CipherKind::ARIA_128_GCM,
  CipherKind::ARIA_192_GCM,
  CipherKind::ARIA_256_GCM,
  CipherKind::ARIA_128_CCM,
  CipherKind::ARIA_192_CCM,
  CipherKind::ARIA_256_CCM,
];

/// Whether the round-trip check must be skipped for this module/operation
/// combination.
pub(crate) fn round_trip_exempt(backend: u64, op: &SymmetricEncrypt) -> bool {
  if backend != module_id("OpenSSL") {
    return false;
  }
  if OPENSSL_NO_ROUNDTRIP.contains(&op.cipher.cipher_type) {
    return true;
  }
  OPENSSL_TAGGED_ONLY.contains(&op.cipher.cipher_type) && op.tag_size.is_none()
}

impl Dispatch for SymmetricEncrypt {
  type Output = Ciphertext;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Ciphertext> {
    if !Options::have(&options.ciphers, self.cipher.cipher_type.id()) {
      return None;
    }

    module.symmetric_encrypt(self)
  }

  fn postprocess(&self, module: &dyn Module, output: &Ciphertext, options: &Options) {
    if options.no_decrypt {
      return;
    }
    if self.cleartext.is_empty() || output.ciphertext.is_empty() {
      return;
    }
    if round_trip_exempt(module.id(), self) {
      return;
    }

    // Feed the produced ciphertext back into the same module. An honest
    // backend must recover the original cleartext.
    let decrypt = SymmetricDecrypt::from_encrypt(
      self,
      output,
      self.cleartext.len() as u64 + 32,
      self.aad.clone(),
      Modifier::empty(),
    );

    let tag_hex = output.tag.as_ref().map_or_else(|| String::from("(none)"), Buffer::to_hex);
    match module.symmetric_decrypt(&decrypt) {
      None => {
        println!("Cannot decrypt ciphertext\n");
        println!("Operation:\n{}", self.render());
        println!("Ciphertext: {}", output.ciphertext.to_hex());
        println!("Tag: {tag_hex}");
        fault::fatal(
          vec![module.name().to_string()],
          Self::NAME,
          &self.algorithm(),
          "cannot decrypt ciphertext",
        );
      }
      Some(cleartext) if cleartext != self.cleartext => {
        println!("Cannot decrypt ciphertext (but decryption ostensibly succeeded)\n");
        println!("Operation:\n{}", self.render());
        println!("Ciphertext: {}", output.ciphertext.to_hex());
        println!("Tag: {tag_hex}");
        println!("Purported cleartext: {}", cleartext.to_hex());
        fault::fatal(
          vec![module.name().to_string()],
          Self::NAME,
          &self.algorithm(),
          "cannot decrypt ciphertext",
        );
      }
      Some(_) => {}
    }
  }

  fn dont_compare(&self) -> bool {
    self.cipher.cipher_type == CipherKind::DES_EDE3_WRAP
  }

  fn sanity_check(&self, module: &dyn Module, output: &Ciphertext) {
    // A backend that claims AEAD success without producing the requested
    // tag would silently break every downstream consumer.
    if self.tag_size.is_some() && output.tag.is_none() {
      fault::fatal(
        vec![module.name().to_string()],
        Self::NAME,
        &self.algorithm(),
        "missing tag",
      );
    }
  }
}

impl Dispatch for SymmetricDecrypt {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Buffer> {
    if !Options::have(&options.ciphers, self.cipher.cipher_type.id()) {
      return None;
    }

    module.symmetric_decrypt(self)
  }

  fn dont_compare(&self) -> bool {
    self.cipher.cipher_type == CipherKind::DES_EDE3_WRAP
  }
}
