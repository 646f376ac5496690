//! Policies for the key-derivation operations.
//!
//! Digest-parameterized KDFs gate on the digest allow-set; scrypt and
//! Argon2 have no algorithm ID to gate on and always dispatch. None of
//! them feed pools.

use components::{
  ops::{
    KdfArgon2, KdfBcrypt, KdfHkdf, KdfPbkdf, KdfPbkdf1, KdfPbkdf2, KdfScrypt, KdfSp800_108, KdfSsh, KdfTls1Prf,
    KdfX963,
  },
  Buffer,
};

use super::Dispatch;
use crate::{module::Module, options::Options};

macro_rules! digest_gated_kdf {
  ($op:ty, $method:ident) => {
    impl Dispatch for $op {
      type Output = Buffer;

      fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Buffer> {
        if !Options::have(&options.digests, self.digest_type.id()) {
          return None;
        }

        module.$method(self)
      }
    }
  };
}

digest_gated_kdf!(KdfHkdf, kdf_hkdf);
digest_gated_kdf!(KdfTls1Prf, kdf_tls1_prf);
digest_gated_kdf!(KdfPbkdf, kdf_pbkdf);
digest_gated_kdf!(KdfPbkdf1, kdf_pbkdf1);
digest_gated_kdf!(KdfPbkdf2, kdf_pbkdf2);
digest_gated_kdf!(KdfSsh, kdf_ssh);
digest_gated_kdf!(KdfX963, kdf_x963);
digest_gated_kdf!(KdfBcrypt, kdf_bcrypt);

impl Dispatch for KdfScrypt {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<Buffer> {
    module.kdf_scrypt(self)
  }
}

impl Dispatch for KdfArgon2 {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<Buffer> {
    module.kdf_argon2(self)
  }
}

impl Dispatch for KdfSp800_108 {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, options: &Options) -> Option<Buffer> {
    // The digest gate only applies in HMAC mode; CMAC mode carries a
    // cipher ID in the same field.
    if self.mech.mode && !Options::have(&options.digests, self.mech.kind) {
      return None;
    }

    module.kdf_sp800_108(self)
  }
}
