//! Signature generation
//!
//! For nonce `r` drawn from `[1, q - 1]`:
//!
//! ```text
//! c1 = (g^r mod p) mod q
//! c2 = (d + a*c1) * r^-1 mod q
//! ```
//!
//! A zero component is degenerate and the nonce is redrawn.
//!
//! # Nonce reuse
//!
//! Two signatures under the same key that share `r` also share `c1`, and the
//! pair of equations for `c2` solves directly for `r` and then `a`. Nonces
//! must come from a cryptographically secure generator and never repeat;
//! [`Signer::sign_with_nonce`] exists only for reproducible test vectors.

use crate::arith::{mod_inverse, mod_pow, sample_inclusive};
use crate::{DomainParameters, Error, MessageDigest, PrivateKey, PublicKey, Result, Signature};
use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

/// Signing context owning the domain parameters and the private key
///
/// The private exponent stays inside this value; nothing hands it back out.
pub struct Signer {
    domain: DomainParameters,
    key: PrivateKey,
}

impl Signer {
    /// Create a signer, checking the group structure and the key range
    pub fn new(domain: DomainParameters, key: PrivateKey) -> Result<Self> {
        domain.validate_group()?;

        let a = key.expose();
        if a.is_zero() || *a >= domain.q {
            return Err(Error::InvalidParameters(
                "Private exponent must lie in [1, q - 1]".into(),
            ));
        }
        if domain.q < BigUint::from(3u32) {
            return Err(Error::InvalidParameters("q must be at least 3".into()));
        }

        Ok(Self { domain, key })
    }

    /// Domain parameters this signer works in
    pub fn domain(&self) -> &DomainParameters {
        &self.domain
    }

    /// Public value matching the held private key
    pub fn public_key(&self) -> Result<PublicKey> {
        self.key.public_key(&self.domain)
    }

    /// Sign `digest` with a fresh nonce from `rng`, retrying on degenerate output
    #[instrument(skip_all)]
    pub fn sign<R>(&self, digest: &MessageDigest, rng: &mut R) -> Result<Signature>
    where
        R: RngCore + CryptoRng,
    {
        let high = &self.domain.q - BigUint::one();
        let mut attempts: u64 = 0;

        loop {
            attempts += 1;
            let r = sample_inclusive(rng, &BigUint::one(), &high);
            match self.sign_raw(digest, &r)? {
                Some(signature) => {
                    debug!(attempts, "Signature generated");
                    return Ok(signature);
                }
                None => debug!(attempts, "Degenerate signature component, redrawing nonce"),
            }
        }
    }

    /// Sign `digest` with the caller's nonce `r`.
    ///
    /// # Errors
    /// * [`Error::InvalidNonce`] when `r` is outside `[1, q - 1]`
    /// * [`Error::DegenerateSignature`] when `r` yields a zero component
    pub fn sign_with_nonce(&self, digest: &MessageDigest, r: &BigUint) -> Result<Signature> {
        if r.is_zero() || *r >= self.domain.q {
            return Err(Error::InvalidNonce);
        }
        self.sign_raw(digest, r)?.ok_or(Error::DegenerateSignature)
    }

    fn sign_raw(&self, digest: &MessageDigest, r: &BigUint) -> Result<Option<Signature>> {
        let DomainParameters { p, q, g } = &self.domain;

        let c1 = mod_pow(g, r, p)? % q;

        // r is in [1, q - 1] and q is prime, so a failure here is fatal
        let r_inv = mod_inverse(r, q)?;
        let c2 = ((digest.value() % q + self.key.expose() * &c1) % q * r_inv) % q;

        if c1.is_zero() || c2.is_zero() {
            return Ok(None);
        }
        Ok(Some(Signature::new(c1, c2)))
    }
}

/// Sign `digest` under `(domain, private_key)` with a nonce from `rng`
pub fn sign<R>(
    digest: &MessageDigest,
    domain: &DomainParameters,
    private_key: &PrivateKey,
    rng: &mut R,
) -> Result<Signature>
where
    R: RngCore + CryptoRng,
{
    Signer::new(domain.clone(), private_key.clone())?.sign(digest, rng)
}
