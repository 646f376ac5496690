//! Differential testing engine for cryptographic backends.
//!
//! `cryptodiff` derives typed cryptographic operations from fuzzer bytes,
//! dispatches each one to every loaded backend, and aborts the process the
//! moment two backends disagree. It implements no cryptography itself; it
//! exists to make independent implementations argue.
//!
//! # Quick Start
//!
//! ```
//! use cryptodiff::{Datasource, Executor, Module, ModuleRegistry, Options};
//! use cryptodiff::ops::Digest;
//! use cryptodiff::Buffer;
//! use std::sync::Arc;
//!
//! struct Null;
//!
//! impl Module for Null {
//!   fn id(&self) -> u64 {
//!     cryptodiff::module_id("Null")
//!   }
//!   fn name(&self) -> &str {
//!     "Null"
//!   }
//! }
//!
//! let mut modules = ModuleRegistry::new();
//! let null: Arc<dyn Module> = Arc::new(Null);
//! modules.insert(null.id(), null);
//!
//! let options = Options::new();
//! let executor: Executor<'_, Digest> = Executor::new(&modules, &options);
//!
//! // A backend that declines everything never produces a comparison.
//! let mut parent = Datasource::new(&[]);
//! executor.run(&mut parent, &[]);
//! ```

pub use components::{
  ids, module_id,
  ops::{self, Operation},
  primitive::{Bignum, Buffer, Modifier, SymmetricCipher},
  results::{self, OpOutput},
};
pub use datasource::{Datasource, OutOfData};
pub use executor::{
  config, dispatch::Dispatch, engine, fault, module::ModuleRegistry, options, pool, prng, probe, Executor, Module,
  Options,
};
