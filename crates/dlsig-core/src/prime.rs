//! Primality testing and prime generation
//!
//! The signature core only depends on the [`PrimalityTest`] trait; the
//! default [`MillerRabin`] implementation is backed by `num-bigint-dig`.

use num_bigint_dig::{prime::probably_prime, BigUint, RandPrime};
use rand::{CryptoRng, RngCore};

/// Miller-Rabin rounds used by [`MillerRabin::default`]
pub const DEFAULT_MR_ROUNDS: usize = 20;

/// Repetitions used by the CLI when re-confirming a freshly found `p`
pub const CONFIRM_REPETITIONS: usize = 20;

/// Probabilistic primality oracle and prime source
pub trait PrimalityTest {
    /// Return `true` if `n` is prime with overwhelming probability
    fn is_probable_prime(&self, n: &BigUint) -> bool;

    /// Return a probable prime of exactly `bit_length` bits
    fn generate_prime<R>(&self, rng: &mut R, bit_length: usize) -> BigUint
    where
        R: RngCore + CryptoRng;
}

/// Miller-Rabin (plus Baillie-PSW) test from `num-bigint-dig`
#[derive(Debug, Clone, Copy)]
pub struct MillerRabin {
    /// Number of random-base Miller-Rabin rounds per call
    pub rounds: usize,
}

impl MillerRabin {
    /// Create a tester running `rounds` Miller-Rabin rounds per call
    pub fn new(rounds: usize) -> Self {
        Self { rounds }
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self::new(DEFAULT_MR_ROUNDS)
    }
}

impl PrimalityTest for MillerRabin {
    fn is_probable_prime(&self, n: &BigUint) -> bool {
        probably_prime(n, self.rounds)
    }

    fn generate_prime<R>(&self, rng: &mut R, bit_length: usize) -> BigUint
    where
        R: RngCore + CryptoRng,
    {
        loop {
            let candidate = rng.gen_prime(bit_length);
            if candidate.bits() == bit_length {
                return candidate;
            }
        }
    }
}

/// Run `test` on `n` up to `repetitions` times, failing on the first negative.
///
/// Each call draws fresh Miller-Rabin bases, so repeating shrinks the chance
/// of accepting a composite.
pub fn loop_is_prime<T: PrimalityTest + ?Sized>(test: &T, n: &BigUint, repetitions: usize) -> bool {
    (0..repetitions.max(1)).all(|_| test.is_probable_prime(n))
}
