//! Key pair generation

use crate::arith::{mod_pow, sample_inclusive};
use crate::{DomainParameters, Error, KeyPair, PrivateKey, PublicKey, Result};
use num_bigint_dig::BigUint;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

/// Draw a private exponent `a` uniformly from `[2, q - 1]` and derive
/// `h = g^a mod p`.
///
/// Parameters are trusted as given; run
/// [`DomainParameters::validate`] first on anything loaded from outside.
#[instrument(skip(domain, rng), fields(p_bits = domain.p.bits()))]
pub fn generate<R>(domain: &DomainParameters, rng: &mut R) -> Result<KeyPair>
where
    R: RngCore + CryptoRng,
{
    let two = BigUint::from(2u32);
    if domain.q <= two {
        return Err(Error::InvalidParameters(
            "q must be at least 3 to hold a private exponent".into(),
        ));
    }
    let high = &domain.q - BigUint::one();

    let a = sample_inclusive(rng, &two, &high);
    let h = mod_pow(&domain.g, &a, &domain.p)?;

    debug!("Key pair generated");

    Ok(KeyPair {
        private: PrivateKey::new(a),
        public: PublicKey::new(h),
    })
}
