//! Corpus pools: bounded, process-wide stores of interesting values.
//!
//! Postprocessors feed scalars, keys, and points observed in backend
//! results into these pools; the host fuzzer's mutator later splices them
//! back into inputs. Insertion is idempotent, eviction is FIFO, and every
//! pool is lock-protected so a multi-threaded harness stays safe.

use std::{
  collections::VecDeque,
  sync::{Mutex, PoisonError},
};

/// Per-pool capacity. Old entries are evicted first.
pub const POOL_CAPACITY: usize = 64;

/// A bounded keyed store with idempotent insert.
#[derive(Debug)]
pub struct Pool<K> {
  entries: Mutex<VecDeque<K>>,
}

impl<K: PartialEq> Pool<K> {
  /// Create an empty pool.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      entries: Mutex::new(VecDeque::new()),
    }
  }

  /// Insert `key` if not already present, evicting the oldest entry at
  /// capacity.
  pub fn set(&self, key: K) {
    let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    if entries.contains(&key) {
      return;
    }
    if entries.len() == POOL_CAPACITY {
      entries.pop_front();
    }
    entries.push_back(key);
  }

  /// Whether `key` is currently pooled.
  #[must_use]
  pub fn contains(&self, key: &K) -> bool {
    self
      .entries
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .contains(key)
  }

  /// Current number of pooled entries.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  /// Whether the pool is empty.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Drop every entry. Test support; the engine never clears pools.
  pub fn clear(&self) {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
  }
}

impl<K: PartialEq> Default for Pool<K> {
  fn default() -> Self {
    Self::new()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pool keys
// ─────────────────────────────────────────────────────────────────────────────

/// A private scalar on a curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurvePrivkey {
  pub curve: u64,
  pub private: String,
}

/// A full keypair on a curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveKeypair {
  pub curve: u64,
  pub private: String,
  pub pub_x: String,
  pub pub_y: String,
}

/// An observed ECDSA signature with its message and signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveEcdsaSignature {
  pub curve: u64,
  pub cleartext: String,
  pub pub_x: String,
  pub pub_y: String,
  pub sig_r: String,
  pub sig_s: String,
}

/// A G1 point on a pairing curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveBlsG1 {
  pub curve: u64,
  pub x: String,
  pub y: String,
}

/// A G2 point on a pairing curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveBlsG2 {
  pub curve: u64,
  pub v: String,
  pub w: String,
  pub x: String,
  pub y: String,
}

/// A complete observed BLS signature: inputs, signer, and signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveBlsSignature {
  pub curve: u64,
  pub hash_or_point: bool,
  pub point_v: String,
  pub point_w: String,
  pub point_x: String,
  pub point_y: String,
  pub cleartext: String,
  pub dest: String,
  pub aug: String,
  pub pub_x: String,
  pub pub_y: String,
  pub sig_v: String,
  pub sig_w: String,
  pub sig_x: String,
  pub sig_y: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Process-wide pools
// ─────────────────────────────────────────────────────────────────────────────

pub static POOL_BIGNUM: Pool<String> = Pool::new();
pub static POOL_CURVE_PRIVKEY: Pool<CurvePrivkey> = Pool::new();
pub static POOL_CURVE_KEYPAIR: Pool<CurveKeypair> = Pool::new();
pub static POOL_CURVE_ECDSA_SIGNATURE: Pool<CurveEcdsaSignature> = Pool::new();
pub static POOL_CURVE_BLS_G1: Pool<CurveBlsG1> = Pool::new();
pub static POOL_CURVE_BLS_G2: Pool<CurveBlsG2> = Pool::new();
pub static POOL_CURVE_BLS_SIGNATURE: Pool<CurveBlsSignature> = Pool::new();
pub static POOL_DH_PRIVATE_KEY: Pool<String> = Pool::new();
pub static POOL_DH_PUBLIC_KEY: Pool<String> = Pool::new();

/// Insert a trimmed decimal string into the bignum pool, respecting the
/// size bound every caller must honor.
pub fn set_bignum(value: String) {
  if value.len() <= crate::config::MAX_BIGNUM_SIZE {
    POOL_BIGNUM.set(value);
  }
}
