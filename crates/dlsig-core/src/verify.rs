//! Signature verification

use crate::arith::{mod_inverse, mod_pow};
use crate::{DomainParameters, MessageDigest, PublicKey, Result, Signature, VerificationKey};
use tracing::debug;

#[cfg(feature = "multi-thread")]
use rayon::prelude::*;

/// Verification context holding `(p, q, g)` and the signer's `h`
#[derive(Debug, Clone)]
pub struct Verifier {
    domain: DomainParameters,
    public: PublicKey,
}

impl Verifier {
    /// Create a verifier without checking its inputs
    pub fn new(domain: DomainParameters, public: PublicKey) -> Self {
        Self { domain, public }
    }

    /// Create a verifier after checking the group and the public value
    pub fn checked(domain: DomainParameters, public: PublicKey) -> Result<Self> {
        domain.validate_group()?;
        public.validate(&domain)?;
        Ok(Self { domain, public })
    }

    /// Domain parameters this verifier works in
    pub fn domain(&self) -> &DomainParameters {
        &self.domain
    }

    /// Return `true` iff `signature` is valid for `digest`.
    ///
    /// Components outside `[1, q - 1]` are rejected before any arithmetic.
    /// Arithmetic failures on malformed parameters also yield `false`.
    pub fn verify(&self, digest: &MessageDigest, signature: &Signature) -> bool {
        match self.check(digest, signature) {
            Ok(valid) => valid,
            Err(e) => {
                debug!(error = %e, "Signature rejected");
                false
            }
        }
    }

    /// Verify many `(digest, signature)` pairs, in parallel when available
    pub fn verify_batch(&self, items: &[(MessageDigest, Signature)]) -> Vec<bool> {
        #[cfg(feature = "multi-thread")]
        let results = items
            .par_iter()
            .map(|(digest, signature)| self.verify(digest, signature))
            .collect();

        #[cfg(not(feature = "multi-thread"))]
        let results = items
            .iter()
            .map(|(digest, signature)| self.verify(digest, signature))
            .collect();

        results
    }

    fn check(&self, digest: &MessageDigest, signature: &Signature) -> Result<bool> {
        let DomainParameters { p, q, g } = &self.domain;
        signature.check_range(q)?;

        let w = mod_inverse(&signature.c2, q)?;
        let u1 = (digest.value() * &w) % q;
        let u2 = (&signature.c1 * &w) % q;

        let v = (mod_pow(g, &u1, p)? * mod_pow(self.public.value(), &u2, p)? % p) % q;

        Ok(v == signature.c1)
    }
}

impl From<VerificationKey> for Verifier {
    fn from(key: VerificationKey) -> Self {
        Self::new(key.domain, key.public)
    }
}

/// Check `signature` over `digest` against `(domain, public_key)`
pub fn verify(
    digest: &MessageDigest,
    domain: &DomainParameters,
    public_key: &PublicKey,
    signature: &Signature,
) -> bool {
    Verifier::new(domain.clone(), public_key.clone()).verify(digest, signature)
}
