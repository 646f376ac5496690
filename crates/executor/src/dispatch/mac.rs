//! Policies for digest and MAC operations.

use components::{
  ids::CipherKind,
  ops::{Cmac, Digest, Hmac},
  Buffer,
};

use super::Dispatch;
use crate::{module::Module, options::Options};

impl Dispatch for Digest {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Buffer> {
    if !Options::have(&options.digests, self.digest_type.id()) {
      return None;
    }

    module.digest(self)
  }
}

impl Dispatch for Hmac {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Buffer> {
    if !Options::have(&options.digests, self.digest_type.id()) {
      return None;
    }

    module.hmac(self)
  }

  fn dont_compare(&self) -> bool {
    // The wrap mode randomizes its IV; results differ per call.
    self.cipher.cipher_type == CipherKind::DES_EDE3_WRAP
  }
}

impl Dispatch for Cmac {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Buffer> {
    if !Options::have(&options.ciphers, self.cipher.cipher_type.id()) {
      return None;
    }

    module.cmac(self)
  }

  fn dont_compare(&self) -> bool {
    self.cipher.cipher_type == CipherKind::DES_EDE3_WRAP
  }
}

#[cfg(test)]
mod tests {
  use components::{ids::DigestKind, Modifier, Operation as _, SymmetricCipher};
  use datasource::Datasource;

  use super::*;

  struct CountingModule {
    calls: std::sync::atomic::AtomicUsize,
  }

  impl CountingModule {
    fn new() -> Self {
      Self {
        calls: std::sync::atomic::AtomicUsize::new(0),
      }
    }
    fn calls(&self) -> usize {
      self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
  }

  impl Module for CountingModule {
    fn id(&self) -> u64 {
      components::module_id("counting")
    }
    fn name(&self) -> &str {
      "counting"
    }
    fn digest(&self, _op: &Digest) -> Option<Buffer> {
      self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
      Some(Buffer::from(&[0u8; 32][..]))
    }
  }

  fn digest_op(kind: DigestKind) -> Digest {
    let mut input = 0u32.to_le_bytes().to_vec();
    input.extend(kind.id().to_le_bytes());
    let mut ds = Datasource::new(&input);
    Digest::read(&mut ds, Modifier::empty()).unwrap()
  }

  #[test]
  fn disallowed_digest_never_reaches_the_backend() {
    let module = CountingModule::new();
    let options = Options::new().with_digests([DigestKind::SHA1.id()]);

    let op = digest_op(DigestKind::SHA256);
    assert!(op.call_module(&module, &options).is_none());
    assert_eq!(module.calls(), 0);
  }

  #[test]
  fn allowed_digest_dispatches() {
    let module = CountingModule::new();
    let options = Options::new();

    let op = digest_op(DigestKind::SHA256);
    assert!(op.call_module(&module, &options).is_some());
    assert_eq!(module.calls(), 1);
  }

  #[test]
  fn des_wrap_suppresses_comparison() {
    let wrap = Cmac {
      modifier: Modifier::empty(),
      cleartext: Buffer::default(),
      cipher: SymmetricCipher {
        iv: Buffer::default(),
        key: Buffer::default(),
        cipher_type: CipherKind::DES_EDE3_WRAP,
      },
    };
    assert!(wrap.dont_compare());

    let cbc = Cmac {
      cipher: SymmetricCipher {
        cipher_type: CipherKind::AES_128_CBC,
        ..wrap.cipher.clone()
      },
      ..wrap.clone()
    };
    assert!(!cbc.dont_compare());
  }
}
