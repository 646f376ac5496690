//! Data model for the differential engine: typed algorithm IDs, byte
//! strings and bignums, the full set of operation variants, and their
//! paired result types.
//!
//! Nothing in this crate computes cryptography. Operations are derived
//! deterministically from fuzzer bytes, results come back from backends,
//! and this crate only carries, compares, and renders them.
//!
//! # Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ids`] | `u64` newtype IDs (FNV-1a-64 of canonical names) |
//! | [`primitive`] | [`Buffer`], [`Bignum`], [`Modifier`], [`SymmetricCipher`] |
//! | [`ops`] | One struct per operation variant, with stream constructors |
//! | [`results`] | Result types and the [`OpOutput`] surface the engine uses |
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to
//! ensure all error paths are handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod ids;
pub mod ops;
pub mod primitive;
pub mod results;

pub use ids::{module_id, CalcOp, CipherKind, CurveKind, DigestKind};
pub use ops::Operation;
pub use primitive::{Bignum, Buffer, Modifier, SymmetricCipher};
pub use results::{
  BlsKeyPair, BlsSignature, Ciphertext, DhKeyPair, EccKeyPair, EccPoint, EcdsaSignature, G1, G2, OpOutput,
};
