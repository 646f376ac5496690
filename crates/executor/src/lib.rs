//! The differential execution engine.
//!
//! This crate turns fuzzer bytes into batches of typed operations, dispatches
//! every batch entry to a cryptographic backend, and compares what comes
//! back. Two backends disagreeing about the same operation is the bug class
//! this whole system exists to find, and it is treated accordingly: the
//! process prints a canonical assertion line and aborts so the fuzzer
//! harness registers a crash.
//!
//! # Pipeline
//!
//! ```text
//! bytes ─► Datasource ─► {op, module}* ─► Executor::run
//!                                           │
//!                        ┌──────────────────┤
//!                        ▼                  ▼
//!                 guard (Dispatch)    module method
//!                        │                  │
//!                        ▼                  ▼
//!                  corpus pools  ◄─  postprocess
//!                                           │
//!                                           ▼
//!                                      comparator
//! ```
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to
//! ensure all error paths are handled explicitly. A backend declining an
//! operation is not an error; it is `None` and drops out of comparison.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod fault;
pub mod module;
pub mod options;
pub mod pool;
pub mod prng;
pub mod probe;

pub use dispatch::Dispatch;
pub use engine::Executor;
pub use module::{Module, ModuleRegistry};
pub use options::Options;
