//! Modular arithmetic over arbitrary-precision integers
//!
//! Square-and-multiply exponentiation and the extended Euclidean inverse.
//! Both are plain functions of their inputs; neither runs in constant time.

use crate::{Error, Result};
use num_bigint_dig::{BigInt, BigUint, RandBigInt, Sign, ToBigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

/// Compute `base^exponent mod modulus` by left-to-right square-and-multiply.
///
/// The exponent is walked from its most significant bit down. Every step
/// squares the accumulator, and a set bit additionally multiplies in `base`.
/// An exponent of zero yields `1 mod modulus`.
///
/// # Errors
/// [`Error::InvalidModulus`] when `modulus` is zero.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidModulus);
    }

    let base = base % modulus;
    let mut acc = BigUint::one() % modulus;

    for byte in exponent.to_bytes_be() {
        for shift in (0..8).rev() {
            acc = (&acc * &acc) % modulus;
            if (byte >> shift) & 1 == 1 {
                acc = (&acc * &base) % modulus;
            }
        }
    }

    Ok(acc)
}

/// Compute the multiplicative inverse of `value` modulo `modulus`.
///
/// Runs the iterative extended Euclidean algorithm, tracking the Bézout
/// coefficient of `value` until the remainder reaches zero, then reduces the
/// coefficient into `[0, modulus)`.
///
/// # Errors
/// * [`Error::InvalidModulus`] when `modulus` is zero
/// * [`Error::NoInverseExists`] when `gcd(value, modulus) != 1`
pub fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidModulus);
    }

    let m = BigInt::from_biguint(Sign::Plus, modulus.clone());
    let mut old_r = BigInt::from_biguint(Sign::Plus, value % modulus);
    let mut r = m.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    // old_r now holds gcd(value, modulus)
    if !old_r.is_one() {
        return Err(Error::NoInverseExists);
    }

    old_s
        .mod_floor(&m)
        .to_biguint()
        .ok_or(Error::NoInverseExists)
}

/// Greatest common divisor of two non-negative integers.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Draw an integer uniformly from the inclusive range `[low, high]`.
pub(crate) fn sample_inclusive<R>(rng: &mut R, low: &BigUint, high: &BigUint) -> BigUint
where
    R: RngCore + CryptoRng,
{
    let upper = high + BigUint::one();
    rng.gen_biguint_range(low, &upper)
}
