//! Domain parameter generation
//!
//! Rejection-sampling search for `(p, q, g)`:
//!
//! 1. draw `k` with exactly `k_bits` bits and a `q_bits`-bit prime `q`
//! 2. set `p = k*q + 1` and redraw both until `p` is prime
//! 3. require the bit length of `p` to fall in the configured window and be
//!    a multiple of `p_bits_multiple`, and require `gcd(p - 1, q) > 1`
//! 4. pick `t` in `[1, p - 1]` and set `g = t^((p-1)/q) mod p`
//! 5. accept iff `g != 1` and `g^q = 1 (mod p)`, otherwise start over
//!
//! There is no natural iteration bound. Callers that need bounded latency
//! pass a [`SearchBudget`].

use crate::arith::{gcd, mod_pow, sample_inclusive};
use crate::prime::{loop_is_prime, MillerRabin, PrimalityTest};
use crate::{DomainParameters, Error, Result};
use num_bigint_dig::BigUint;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, trace};

/// Default subgroup order size
pub const DEFAULT_Q_BITS: usize = 160;

/// Default cofactor size; `k` is drawn from `[2^415, 2^416)`
pub const DEFAULT_K_BITS: usize = 416;

/// Smallest accepted bit length of `p`
pub const DEFAULT_P_MIN_BITS: usize = 512;

/// Largest accepted bit length of `p`
pub const DEFAULT_P_MAX_BITS: usize = 1024;

/// Bit length of `p` must be a multiple of this
pub const DEFAULT_P_BITS_MULTIPLE: usize = 64;

/// Size constraints for the parameter search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterConfig {
    /// Exact bit length of `q`
    pub q_bits: usize,
    /// Exact bit length of the cofactor `k`
    pub k_bits: usize,
    /// Inclusive lower bound on the bit length of `p`
    pub p_min_bits: usize,
    /// Inclusive upper bound on the bit length of `p`
    pub p_max_bits: usize,
    /// Required divisor of the bit length of `p`
    pub p_bits_multiple: usize,
    /// Independent primality calls spent on each candidate `p`
    pub confirm_rounds: usize,
}

impl ParameterConfig {
    /// Create a configuration, rejecting sizes the search can never satisfy
    pub fn new(
        q_bits: usize,
        k_bits: usize,
        p_min_bits: usize,
        p_max_bits: usize,
        p_bits_multiple: usize,
    ) -> Result<Self> {
        let config = Self {
            q_bits,
            k_bits,
            p_min_bits,
            p_max_bits,
            p_bits_multiple,
            confirm_rounds: 1,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the search can terminate under these sizes.
    ///
    /// The fields are public, so [`ParameterGenerator::search`] runs this
    /// again before drawing anything.
    pub fn validate(&self) -> Result<()> {
        if self.q_bits < 2 || self.k_bits < 2 {
            return Err(Error::InvalidConfig(
                "q and k must be at least 2 bits".into(),
            ));
        }
        if self.p_bits_multiple == 0 {
            return Err(Error::InvalidConfig(
                "Bit length multiple must be positive".into(),
            ));
        }
        if self.p_min_bits > self.p_max_bits {
            return Err(Error::InvalidConfig(format!(
                "Minimum p size {} exceeds maximum {}",
                self.p_min_bits, self.p_max_bits
            )));
        }
        if self.confirm_rounds == 0 {
            return Err(Error::InvalidConfig(
                "Confirmation rounds must be positive".into(),
            ));
        }

        // k*q + 1 has either k_bits + q_bits - 1 or k_bits + q_bits bits
        let top = self
            .k_bits
            .checked_add(self.q_bits)
            .ok_or_else(|| Error::InvalidConfig("q and k sizes overflow".into()))?;
        let reachable = top - 1..=top;
        if !reachable.clone().any(|bits| self.accepts_p_bits(bits)) {
            return Err(Error::InvalidConfig(format!(
                "No p of {:?} bits satisfies the size constraints",
                reachable
            )));
        }
        Ok(())
    }

    /// Spend `rounds` independent primality calls on each candidate `p`
    pub fn with_confirm_rounds(mut self, rounds: usize) -> Result<Self> {
        if rounds == 0 {
            return Err(Error::InvalidConfig(
                "Confirmation rounds must be positive".into(),
            ));
        }
        self.confirm_rounds = rounds;
        Ok(self)
    }

    /// Whether a `p` of `bits` bits passes the size predicate
    pub fn accepts_p_bits(&self, bits: usize) -> bool {
        self.p_bits_multiple != 0
            && (self.p_min_bits..=self.p_max_bits).contains(&bits)
            && bits % self.p_bits_multiple == 0
    }
}

impl Default for ParameterConfig {
    fn default() -> Self {
        Self {
            q_bits: DEFAULT_Q_BITS,
            k_bits: DEFAULT_K_BITS,
            p_min_bits: DEFAULT_P_MIN_BITS,
            p_max_bits: DEFAULT_P_MAX_BITS,
            p_bits_multiple: DEFAULT_P_BITS_MULTIPLE,
            confirm_rounds: 1,
        }
    }
}

/// Cooperative cancellation flag shared between a search and its caller
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create an untriggered token
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every search holding a clone of this token to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Caller-imposed limits on the parameter search
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    /// Maximum number of `(k, q)` draws
    pub max_iterations: Option<u64>,
    /// Wall-clock deadline
    pub deadline: Option<Instant>,
    /// Cancellation token polled once per draw
    pub cancel: Option<CancellationToken>,
}

impl SearchBudget {
    /// No limits at all
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Stop after `iterations` draws
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Stop once `timeout` has elapsed from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Stop at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check(&self, iterations: u64) -> Result<()> {
        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(Error::SearchCancelled { iterations });
        }
        if self.max_iterations.is_some_and(|max| iterations >= max) {
            return Err(Error::SearchExhausted { iterations });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(Error::SearchTimedOut { iterations });
        }
        Ok(())
    }
}

/// Counters describing a finished search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Total `(k, q)` draws
    pub iterations: u64,
    /// Draws where `k*q + 1` was composite
    pub composite: u64,
    /// Prime `p` rejected by the size or gcd predicate
    pub rejected_size: u64,
    /// Prime `p` rejected because the candidate generator failed
    pub rejected_generator: u64,
}

/// Searches for domain parameters under a configuration and budget
pub struct ParameterGenerator<T: PrimalityTest = MillerRabin> {
    config: ParameterConfig,
    budget: SearchBudget,
    test: T,
}

impl ParameterGenerator<MillerRabin> {
    /// Create a generator with the default primality test and no budget
    pub fn new(config: ParameterConfig) -> Self {
        Self {
            config,
            budget: SearchBudget::unbounded(),
            test: MillerRabin::default(),
        }
    }
}

impl<T: PrimalityTest> ParameterGenerator<T> {
    /// Replace the primality collaborator
    pub fn with_primality_test<U: PrimalityTest>(self, test: U) -> ParameterGenerator<U> {
        ParameterGenerator {
            config: self.config,
            budget: self.budget,
            test,
        }
    }

    /// Bound the search
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &ParameterConfig {
        &self.config
    }

    /// Run the search and return only the parameters
    pub fn generate<R>(&self, rng: &mut R) -> Result<DomainParameters>
    where
        R: RngCore + CryptoRng,
    {
        self.search(rng).map(|(domain, _)| domain)
    }

    /// Run the search, returning the parameters and its counters
    #[instrument(skip(self, rng), fields(q_bits = self.config.q_bits, k_bits = self.config.k_bits))]
    pub fn search<R>(&self, rng: &mut R) -> Result<(DomainParameters, SearchStats)>
    where
        R: RngCore + CryptoRng,
    {
        self.config.validate()?;

        info!(
            p_min_bits = self.config.p_min_bits,
            p_max_bits = self.config.p_max_bits,
            p_bits_multiple = self.config.p_bits_multiple,
            "Starting domain parameter search"
        );

        let k_low = BigUint::one() << (self.config.k_bits - 1);
        let k_high = (BigUint::one() << self.config.k_bits) - BigUint::one();
        let mut stats = SearchStats::default();

        loop {
            self.budget.check(stats.iterations)?;
            stats.iterations += 1;

            let k = sample_inclusive(rng, &k_low, &k_high);
            let q = self.test.generate_prime(rng, self.config.q_bits);
            let p = &k * &q + BigUint::one();

            if !loop_is_prime(&self.test, &p, self.config.confirm_rounds) {
                stats.composite += 1;
                continue;
            }

            let p_minus_one = &p - BigUint::one();
            let p_bits = p.bits();
            if !self.config.accepts_p_bits(p_bits) || gcd(&p_minus_one, &q) <= BigUint::one() {
                trace!(p_bits, "Prime p rejected by size predicate");
                stats.rejected_size += 1;
                continue;
            }

            let t = sample_inclusive(rng, &BigUint::one(), &p_minus_one);
            let g = mod_pow(&t, &(&p_minus_one / &q), &p)?;
            if g.is_one() || !mod_pow(&g, &q, &p)?.is_one() {
                trace!("Candidate generator rejected");
                stats.rejected_generator += 1;
                continue;
            }

            info!(
                iterations = stats.iterations,
                composite = stats.composite,
                p_bits,
                "Domain parameters found"
            );

            return Ok((DomainParameters::new(p, q, g), stats));
        }
    }
}

impl DomainParameters {
    /// Check every invariant the search guarantees.
    ///
    /// `p` and `q` are prime, the bit lengths match `config`,
    /// `gcd(p - 1, q) > 1`, and the group checks of
    /// [`validate_group`](Self::validate_group) hold.
    pub fn validate<T: PrimalityTest>(&self, config: &ParameterConfig, test: &T) -> Result<()> {
        config.validate()?;
        self.validate_group()?;

        if !test.is_probable_prime(&self.p) {
            return Err(Error::InvalidParameters("p is not prime".into()));
        }
        if !test.is_probable_prime(&self.q) {
            return Err(Error::InvalidParameters("q is not prime".into()));
        }
        if self.q.bits() != config.q_bits {
            return Err(Error::InvalidParameters(format!(
                "q has {} bits, expected {}",
                self.q.bits(),
                config.q_bits
            )));
        }
        if !config.accepts_p_bits(self.p.bits()) {
            return Err(Error::InvalidParameters(format!(
                "p has {} bits, outside the accepted sizes",
                self.p.bits()
            )));
        }
        if gcd(&(&self.p - BigUint::one()), &self.q) <= BigUint::one() {
            return Err(Error::InvalidParameters("gcd(p - 1, q) must exceed 1".into()));
        }
        Ok(())
    }
}

/// Generate domain parameters with the default sizes and no budget
pub fn generate_parameters<R>(rng: &mut R) -> Result<DomainParameters>
where
    R: RngCore + CryptoRng,
{
    ParameterGenerator::new(ParameterConfig::default()).generate(rng)
}
