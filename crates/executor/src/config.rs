//! Engine-wide constants.

/// Upper bound, in bytes of the decimal representation, on bignums accepted
/// by guards and fed back into pools. Larger inputs risk quadratic-time
/// blowups inside backends.
pub const MAX_BIGNUM_SIZE: usize = 4096;

/// Key-material bound for private-to-public and signing guards.
pub const MAX_KEY_MATERIAL_SIZE: usize = 4096;

/// Order of the BLS12-381 G1/G2 subgroups (the scalar field modulus).
pub const BLS12_381_R: &str = "52435875175126190479447740508185965837690552500527637822603658699938581184513";

/// The BLS12-381 base field modulus.
pub const BLS12_381_P: &str =
  "4002409555221667393417789825735904156556882819939007885332058136124031650490837864442687629129015664037894272559787";

/// 2^256, for executors exercising fixed-width modular arithmetic.
pub const MOD_2EXP256: &str = "115792089237316195423570985008687907853269984665640564039457584007913129639936";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn moduli_are_decimal() {
    for modulus in [BLS12_381_R, BLS12_381_P, MOD_2EXP256] {
      assert!(modulus.bytes().all(|b| b.is_ascii_digit()));
      assert!(modulus.len() <= MAX_BIGNUM_SIZE);
    }
  }

  #[test]
  fn mod_2exp256_is_a_power_of_two() {
    // 2^256 ends in 6 and has 78 digits.
    assert_eq!(MOD_2EXP256.len(), 78);
    assert!(MOD_2EXP256.ends_with('6'));
  }
}
