//! Policies for the finite-field Diffie-Hellman operations.

use components::{
  ops::{DhDerive, DhGenerateKeyPair},
  results::DhKeyPair,
  Bignum,
};

use super::Dispatch;
use crate::{
  config::MAX_BIGNUM_SIZE,
  module::Module,
  options::Options,
  pool::{POOL_DH_PRIVATE_KEY, POOL_DH_PUBLIC_KEY},
  prng,
};

impl Dispatch for DhDerive {
  type Output = Bignum;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<Bignum> {
    if self.prime.len() > MAX_BIGNUM_SIZE {
      return None;
    }
    if self.base.len() > MAX_BIGNUM_SIZE {
      return None;
    }
    if self.public.len() > MAX_BIGNUM_SIZE {
      return None;
    }
    if self.private.len() > MAX_BIGNUM_SIZE {
      return None;
    }

    module.dh_derive(self)
  }
}

impl Dispatch for DhGenerateKeyPair {
  type Output = DhKeyPair;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<DhKeyPair> {
    if self.prime.len() > MAX_BIGNUM_SIZE {
      return None;
    }
    if self.base.len() > MAX_BIGNUM_SIZE {
      return None;
    }

    module.dh_generate_keypair(self)
  }

  fn postprocess(&self, _module: &dyn Module, output: &DhKeyPair, _options: &Options) {
    // Sample one in four keypairs; the pools stay diverse without every
    // generated key displacing older entries.
    if prng::next_u32() % 4 == 0 {
      POOL_DH_PRIVATE_KEY.set(output.private.to_trimmed_string());
      POOL_DH_PUBLIC_KEY.set(output.public.to_trimmed_string());
    }
  }

  fn dont_compare(&self) -> bool {
    true
  }
}

#[cfg(test)]
mod tests {
  use components::Modifier;

  use super::*;

  struct DhModule;

  impl Module for DhModule {
    fn id(&self) -> u64 {
      components::module_id("dh")
    }
    fn name(&self) -> &str {
      "dh"
    }
    fn dh_derive(&self, _op: &DhDerive) -> Option<Bignum> {
      Some(Bignum::from("8"))
    }
    fn dh_generate_keypair(&self, _op: &DhGenerateKeyPair) -> Option<DhKeyPair> {
      Some(DhKeyPair {
        private: Bignum::from("271828"),
        public: Bignum::from("314159"),
      })
    }
  }

  #[test]
  fn oversized_group_parameters_are_guarded() {
    let op = DhDerive {
      modifier: Modifier::empty(),
      prime: Bignum::new("1".repeat(MAX_BIGNUM_SIZE + 1)),
      base: Bignum::from("2"),
      public: Bignum::from("3"),
      private: Bignum::from("4"),
    };
    assert!(op.call_module(&DhModule, &Options::new()).is_none());

    let ok = DhDerive {
      prime: Bignum::from("23"),
      ..op
    };
    assert!(ok.call_module(&DhModule, &Options::new()).is_some());
  }

  #[test]
  fn generate_keypair_never_compares() {
    let op = DhGenerateKeyPair {
      modifier: Modifier::empty(),
      prime: Bignum::from("23"),
      base: Bignum::from("5"),
    };
    assert!(op.dont_compare());
  }

  #[test]
  fn sampled_keypairs_reach_the_pools() {
    let _guard = crate::prng::test_lock();

    let op = DhGenerateKeyPair {
      modifier: Modifier::empty(),
      prime: Bignum::from("23"),
      base: Bignum::from("5"),
    };
    let output = DhModule.dh_generate_keypair(&op).unwrap();

    // The gate fires on average every fourth call; enough rounds make the
    // insert deterministic without pinning the PRNG stream.
    for _ in 0..64 {
      op.postprocess(&DhModule, &output, &Options::new());
    }

    assert!(POOL_DH_PRIVATE_KEY.contains(&String::from("271828")));
    assert!(POOL_DH_PUBLIC_KEY.contains(&String::from("314159")));
  }
}
