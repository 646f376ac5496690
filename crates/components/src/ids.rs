//! Typed 64-bit algorithm identifiers.
//!
//! Every algorithm the engine can name — digests, ciphers, curves, bignum
//! calculator operations — is addressed by the FNV-1a-64 hash of its
//! canonical name. Hashing keeps the ID space stable across builds without a
//! central registry, and lets backends agree on IDs by agreeing on names.
//!
//! The [`algorithm_ids!`] macro generates one newtype per ID family, a named
//! constant per known algorithm, and a reverse table used for diagnostics.
//! Unknown IDs are legal everywhere (the guard stage simply filters them);
//! they render as hex.

use core::fmt;

/// FNV-1a-64 over a name. The sole source of algorithm and module IDs.
#[allow(clippy::indexing_slicing)] // const-eval indexing over a checked range
#[must_use]
pub const fn id_from_name(name: &str) -> u64 {
  let bytes = name.as_bytes();
  let mut hash = 0xcbf2_9ce4_8422_2325u64;
  let mut i = 0;
  while i < bytes.len() {
    hash ^= bytes[i] as u64;
    hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    i += 1;
  }
  hash
}

/// ID of a backend module, derived from its display name.
#[inline]
#[must_use]
pub const fn module_id(name: &str) -> u64 {
  id_from_name(name)
}

/// Generates an ID newtype with named constants and a reverse-name table.
macro_rules! algorithm_ids {
  (
    $(#[$meta:meta])*
    $ty:ident, $table:ident {
      $( $const_name:ident => $name:literal ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $ty(u64);

    /// Known `(id, name)` pairs for this family, used for diagnostics.
    pub static $table: &[(u64, &str)] = &[
      $( (id_from_name($name), $name), )+
    ];

    impl $ty {
      $(
        pub const $const_name: Self = Self(id_from_name($name));
      )+

      /// Wrap a raw 64-bit ID (typically decoded from the byte stream).
      #[inline]
      #[must_use]
      pub const fn from_id(id: u64) -> Self {
        Self(id)
      }

      /// The raw 64-bit ID.
      #[inline]
      #[must_use]
      pub const fn id(self) -> u64 {
        self.0
      }

      /// The canonical name, if this is a known algorithm.
      #[must_use]
      pub fn name(self) -> Option<&'static str> {
        $table.iter().find(|(id, _)| *id == self.0).map(|(_, name)| *name)
      }
    }

    impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
          Some(name) => f.write_str(name),
          None => write!(f, "{:#018x}", self.0),
        }
      }
    }

    impl From<u64> for $ty {
      #[inline]
      fn from(id: u64) -> Self {
        Self(id)
      }
    }
  };
}

algorithm_ids! {
  /// A message-digest algorithm.
  DigestKind, DIGEST_NAMES {
    MD5 => "MD5",
    RIPEMD160 => "RIPEMD160",
    SHA1 => "SHA-1",
    SHA224 => "SHA-224",
    SHA256 => "SHA-256",
    SHA384 => "SHA-384",
    SHA512 => "SHA-512",
    SHA3_224 => "SHA3-224",
    SHA3_256 => "SHA3-256",
    SHA3_384 => "SHA3-384",
    SHA3_512 => "SHA3-512",
    SHAKE128 => "SHAKE128",
    SHAKE256 => "SHAKE256",
    BLAKE2B512 => "BLAKE2B512",
    BLAKE2S256 => "BLAKE2S256",
    SM3 => "SM3",
    WHIRLPOOL => "WHIRLPOOL",
    STREEBOG_256 => "STREEBOG-256",
    STREEBOG_512 => "STREEBOG-512",
    GOST_R_34_11_94 => "GOST-R-34.11-94",
  }
}

algorithm_ids! {
  /// A symmetric cipher, including AEAD modes.
  CipherKind, CIPHER_NAMES {
    AES_128_CBC => "AES_128_CBC",
    AES_192_CBC => "AES_192_CBC",
    AES_256_CBC => "AES_256_CBC",
    AES_128_CTR => "AES_128_CTR",
    AES_192_CTR => "AES_192_CTR",
    AES_256_CTR => "AES_256_CTR",
    AES_128_GCM => "AES_128_GCM",
    AES_192_GCM => "AES_192_GCM",
    AES_256_GCM => "AES_256_GCM",
    AES_128_CCM => "AES_128_CCM",
    AES_192_CCM => "AES_192_CCM",
    AES_256_CCM => "AES_256_CCM",
    AES_128_OCB => "AES_128_OCB",
    AES_256_OCB => "AES_256_OCB",
    AES_128_XTS => "AES_128_XTS",
    AES_256_XTS => "AES_256_XTS",
    ARIA_128_GCM => "ARIA_128_GCM",
    ARIA_192_GCM => "ARIA_192_GCM",
    ARIA_256_GCM => "ARIA_256_GCM",
    ARIA_128_CCM => "ARIA_128_CCM",
    ARIA_192_CCM => "ARIA_192_CCM",
    ARIA_256_CCM => "ARIA_256_CCM",
    CHACHA20 => "CHACHA20",
    CHACHA20_POLY1305 => "CHACHA20_POLY1305",
    DES_EDE3_CBC => "DES_EDE3_CBC",
    DES_EDE3_WRAP => "DES_EDE3_WRAP",
    SM4_CBC => "SM4_CBC",
    CAMELLIA_128_CBC => "CAMELLIA_128_CBC",
    CAMELLIA_256_CBC => "CAMELLIA_256_CBC",
  }
}

algorithm_ids! {
  /// An elliptic curve.
  CurveKind, CURVE_NAMES {
    SECP192R1 => "secp192r1",
    SECP224R1 => "secp224r1",
    SECP256R1 => "secp256r1",
    SECP256K1 => "secp256k1",
    SECP384R1 => "secp384r1",
    SECP521R1 => "secp521r1",
    BRAINPOOL256R1 => "brainpool256r1",
    BRAINPOOL384R1 => "brainpool384r1",
    BRAINPOOL512R1 => "brainpool512r1",
    X25519 => "x25519",
    X448 => "x448",
    ED25519 => "ed25519",
    ED448 => "ed448",
    BLS12_381 => "BLS12_381",
    SR25519 => "sr25519",
  }
}

algorithm_ids! {
  /// A bignum calculator operation.
  CalcOp, CALCOP_NAMES {
    ADD => "Add(A,B)",
    SUB => "Sub(A,B)",
    MUL => "Mul(A,B)",
    DIV => "Div(A,B)",
    MOD => "Mod(A,B)",
    EXP_MOD => "ExpMod(A,B,C)",
    EXP => "Exp(A,B)",
    EXP2 => "Exp2(A)",
    SQR => "Sqr(A)",
    SQRT => "Sqrt(A)",
    GCD => "GCD(A,B)",
    LCM => "LCM(A,B)",
    INV_MOD => "InvMod(A,B)",
    CMP => "Cmp(A,B)",
    ABS => "Abs(A)",
    NEG => "Neg(A)",
    RSHIFT => "RShift(A,B)",
    LSHIFT1 => "LShift1(A)",
    MOD_LSHIFT => "ModLShift(A,B,C)",
    SET_BIT => "SetBit(A,B)",
    CLEAR_BIT => "ClearBit(A,B)",
    BIT => "Bit(A,B)",
    ADD_MOD => "AddMod(A,B,C)",
    SUB_MOD => "SubMod(A,B,C)",
    MUL_MOD => "MulMod(A,B,C)",
    SQR_MOD => "SqrMod(A,B)",
    NUM_BITS => "NumBits(A)",
    IS_EVEN => "IsEven(A)",
    IS_ODD => "IsOdd(A)",
    IS_ZERO => "IsZero(A)",
    IS_ONE => "IsOne(A)",
    IS_PRIME => "IsPrime(A)",
    RAND => "Rand()",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_are_stable_name_hashes() {
    assert_eq!(DigestKind::SHA256.id(), id_from_name("SHA-256"));
    assert_eq!(CipherKind::DES_EDE3_WRAP.id(), id_from_name("DES_EDE3_WRAP"));
    assert_eq!(CurveKind::ED25519.id(), id_from_name("ed25519"));
    assert_eq!(CalcOp::RAND.id(), id_from_name("Rand()"));
  }

  #[test]
  fn ids_are_distinct_within_a_family() {
    for (i, (a, _)) in DIGEST_NAMES.iter().enumerate() {
      for (b, _) in DIGEST_NAMES.iter().skip(i + 1) {
        assert_ne!(a, b);
      }
    }
    for (i, (a, _)) in CIPHER_NAMES.iter().enumerate() {
      for (b, _) in CIPHER_NAMES.iter().skip(i + 1) {
        assert_ne!(a, b);
      }
    }
    for (i, (a, _)) in CALCOP_NAMES.iter().enumerate() {
      for (b, _) in CALCOP_NAMES.iter().skip(i + 1) {
        assert_ne!(a, b);
      }
    }
  }

  #[test]
  fn known_ids_render_by_name() {
    use alloc::string::ToString;
    assert_eq!(DigestKind::SHA256.to_string(), "SHA-256");
    assert_eq!(CurveKind::SECP256K1.to_string(), "secp256k1");
  }

  #[test]
  fn unknown_ids_render_as_hex() {
    use alloc::string::ToString;
    let unknown = DigestKind::from_id(0x1234);
    assert!(unknown.name().is_none());
    assert_eq!(unknown.to_string(), "0x0000000000001234");
  }

  #[test]
  fn round_trip_through_raw_id() {
    let raw = CurveKind::SECP256K1.id();
    assert_eq!(CurveKind::from_id(raw), CurveKind::SECP256K1);
    assert_eq!(CurveKind::from(raw), CurveKind::SECP256K1);
  }

  #[test]
  fn module_id_matches_name_hash() {
    assert_eq!(module_id("OpenSSL"), id_from_name("OpenSSL"));
    assert_ne!(module_id("OpenSSL"), module_id("BoringSSL"));
  }
}
