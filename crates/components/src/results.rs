//! Result types paired with the operation variants, and the uniform surface
//! the engine needs from them: equality, JSON projection, diagnostic
//! rendering, and access to every raw output byte (for the memory probe).

use alloc::{format, string::String};
use core::fmt;

use serde_json::{json, Value};

use crate::primitive::{Bignum, Buffer};

/// Uniform surface over every operation's result type.
///
/// `visit_bytes` must walk every byte buffer the backend produced; the
/// engine's memory-safety probe reads each one exactly once.
pub trait OpOutput: Clone + PartialEq + fmt::Debug {
  /// JSON projection for the append-only result log.
  fn to_json(&self) -> Value;

  /// Human-readable rendering for mismatch diagnostics.
  fn render(&self) -> String;

  /// Visit every backend-produced byte buffer.
  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8]));
}

impl OpOutput for Buffer {
  fn to_json(&self) -> Value {
    json!(self.to_hex())
  }

  fn render(&self) -> String {
    format!("{self}")
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    visit(self.as_slice());
  }
}

impl OpOutput for Bignum {
  fn to_json(&self) -> Value {
    json!(self.to_trimmed_string())
  }

  fn render(&self) -> String {
    self.to_trimmed_string()
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    visit(self.as_str().as_bytes());
  }
}

impl OpOutput for bool {
  fn to_json(&self) -> Value {
    json!(self)
  }

  fn render(&self) -> String {
    String::from(if *self { "true" } else { "false" })
  }

  fn visit_bytes(&self, _visit: &mut dyn FnMut(&[u8])) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Symmetric encryption
// ─────────────────────────────────────────────────────────────────────────────

/// Ciphertext plus the authentication tag, when the mode produces one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
  pub ciphertext: Buffer,
  pub tag: Option<Buffer>,
}

impl OpOutput for Ciphertext {
  fn to_json(&self) -> Value {
    json!({
      "ciphertext": self.ciphertext.to_hex(),
      "tag": self.tag.as_ref().map(Buffer::to_hex),
    })
  }

  fn render(&self) -> String {
    match &self.tag {
      Some(tag) => format!("ciphertext: {}\ntag: {}", self.ciphertext, tag),
      None => format!("ciphertext: {}\ntag: (none)", self.ciphertext),
    }
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    visit(self.ciphertext.as_slice());
    if let Some(tag) = &self.tag {
      visit(tag.as_slice());
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Elliptic-curve results
// ─────────────────────────────────────────────────────────────────────────────

/// An affine curve point. Also serves as a BLS G1 element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EccPoint {
  pub x: Bignum,
  pub y: Bignum,
}

/// BLS G1 elements share the affine-point representation.
pub type G1 = EccPoint;

impl EccPoint {
  /// Decode `(x, y)` from the stream.
  pub fn read(ds: &mut datasource::Datasource<'_>) -> Result<Self, datasource::OutOfData> {
    Ok(Self {
      x: Bignum::read(ds)?,
      y: Bignum::read(ds)?,
    })
  }
}

impl OpOutput for EccPoint {
  fn to_json(&self) -> Value {
    json!([self.x.to_trimmed_string(), self.y.to_trimmed_string()])
  }

  fn render(&self) -> String {
    format!("x: {}\ny: {}", self.x, self.y)
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    visit(self.x.as_str().as_bytes());
    visit(self.y.as_str().as_bytes());
  }
}

/// A private scalar with its public point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EccKeyPair {
  pub private: Bignum,
  pub public: EccPoint,
}

impl OpOutput for EccKeyPair {
  fn to_json(&self) -> Value {
    json!({
      "priv": self.private.to_trimmed_string(),
      "pub": self.public.to_json(),
    })
  }

  fn render(&self) -> String {
    format!("priv: {}\n{}", self.private, self.public.render())
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    visit(self.private.as_str().as_bytes());
    self.public.visit_bytes(visit);
  }
}

/// An ECDSA signature together with the signer's recovered public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
  pub r: Bignum,
  pub s: Bignum,
  pub public: EccPoint,
}

impl EcdsaSignature {
  /// Decode public key then `(r, s)` from the stream.
  pub fn read(ds: &mut datasource::Datasource<'_>) -> Result<Self, datasource::OutOfData> {
    Ok(Self {
      public: EccPoint::read(ds)?,
      r: Bignum::read(ds)?,
      s: Bignum::read(ds)?,
    })
  }
}

impl OpOutput for EcdsaSignature {
  fn to_json(&self) -> Value {
    json!({
      "signature": [self.r.to_trimmed_string(), self.s.to_trimmed_string()],
      "pub": self.public.to_json(),
    })
  }

  fn render(&self) -> String {
    format!("r: {}\ns: {}\npub {}", self.r, self.s, self.public.render())
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    visit(self.r.as_str().as_bytes());
    visit(self.s.as_str().as_bytes());
    self.public.visit_bytes(visit);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Diffie-Hellman
// ─────────────────────────────────────────────────────────────────────────────

/// A DH private/public scalar pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DhKeyPair {
  pub private: Bignum,
  pub public: Bignum,
}

impl OpOutput for DhKeyPair {
  fn to_json(&self) -> Value {
    json!([self.private.to_trimmed_string(), self.public.to_trimmed_string()])
  }

  fn render(&self) -> String {
    format!("priv: {}\npub: {}", self.private, self.public)
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    visit(self.private.as_str().as_bytes());
    visit(self.public.as_str().as_bytes());
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// BLS results
// ─────────────────────────────────────────────────────────────────────────────

/// A G2 element: two field-extension coordinates of two components each.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct G2 {
  pub v: Bignum,
  pub w: Bignum,
  pub x: Bignum,
  pub y: Bignum,
}

impl G2 {
  /// Decode `(v, w, x, y)` from the stream.
  pub fn read(ds: &mut datasource::Datasource<'_>) -> Result<Self, datasource::OutOfData> {
    Ok(Self {
      v: Bignum::read(ds)?,
      w: Bignum::read(ds)?,
      x: Bignum::read(ds)?,
      y: Bignum::read(ds)?,
    })
  }

  /// The four coordinates in `(v, w, x, y)` order.
  #[must_use]
  pub fn coordinates(&self) -> [&Bignum; 4] {
    [&self.v, &self.w, &self.x, &self.y]
  }
}

impl OpOutput for G2 {
  fn to_json(&self) -> Value {
    json!([
      [self.v.to_trimmed_string(), self.w.to_trimmed_string()],
      [self.x.to_trimmed_string(), self.y.to_trimmed_string()],
    ])
  }

  fn render(&self) -> String {
    format!("v: {}\nw: {}\nx: {}\ny: {}", self.v, self.w, self.x, self.y)
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    for coord in self.coordinates() {
      visit(coord.as_str().as_bytes());
    }
  }
}

/// A BLS signature (G2) with the signer's public key (G1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsSignature {
  pub signature: G2,
  pub public: G1,
}

impl OpOutput for BlsSignature {
  fn to_json(&self) -> Value {
    json!({
      "signature": self.signature.to_json(),
      "pub": self.public.to_json(),
    })
  }

  fn render(&self) -> String {
    format!("signature:\n{}\npub:\n{}", self.signature.render(), self.public.render())
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    self.signature.visit_bytes(visit);
    self.public.visit_bytes(visit);
  }
}

/// A BLS private scalar with its G1 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsKeyPair {
  pub private: Bignum,
  pub public: G1,
}

impl OpOutput for BlsKeyPair {
  fn to_json(&self) -> Value {
    json!({
      "priv": self.private.to_trimmed_string(),
      "pub": self.public.to_json(),
    })
  }

  fn render(&self) -> String {
    format!("priv: {}\npub:\n{}", self.private, self.public.render())
  }

  fn visit_bytes(&self, visit: &mut dyn FnMut(&[u8])) {
    visit(self.private.as_str().as_bytes());
    self.public.visit_bytes(visit);
  }
}
