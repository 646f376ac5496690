//! Policies for the remaining operations. No guards, no pool feedback.

use components::{
  ops::{Misc, Sr25519Verify},
  Buffer,
};

use super::Dispatch;
use crate::{module::Module, options::Options};

impl Dispatch for Sr25519Verify {
  type Output = bool;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<bool> {
    module.sr25519_verify(self)
  }
}

impl Dispatch for Misc {
  type Output = Buffer;

  fn call_module(&self, module: &dyn Module, _options: &Options) -> Option<Buffer> {
    module.misc(self)
  }
}
