//! # dlsig core
//!
//! Discrete-logarithm signatures over a prime-order subgroup of Z*_p.
//!
//! This crate provides:
//! - Domain parameter generation (`p = k*q + 1`, generator of order `q`)
//! - Key pair generation
//! - Signing and verification
//! - The modular arithmetic underneath (square-and-multiply, extended Euclid)
//!
//! ## Scheme
//!
//! With private exponent `a`, public `h = g^a mod p`, digest `d` and a
//! per-signature nonce `r`:
//!
//! ```text
//! c1 = (g^r mod p) mod q
//! c2 = (d + a*c1) * r^-1 mod q
//! valid iff ((g^(d*w) * h^(c1*w)) mod p) mod q == c1   where w = c2^-1 mod q
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use dlsig_core::{hash_document, keygen, ParameterConfig, ParameterGenerator, Signer, Verifier};
//! use rand::rngs::OsRng;
//!
//! let domain = ParameterGenerator::new(ParameterConfig::default()).generate(&mut OsRng)?;
//! let pair = keygen::generate(&domain, &mut OsRng)?;
//!
//! let digest = hash_document(b"hello");
//! let signer = Signer::new(domain.clone(), pair.private)?;
//! let signature = signer.sign(&digest, &mut OsRng)?;
//!
//! assert!(Verifier::new(domain, pair.public).verify(&digest, &signature));
//! ```

pub mod arith;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod keygen;
pub mod params;
pub mod prime;
pub mod sign;
pub mod types;
pub mod verify;

pub use encoding::DecimalLines;
pub use error::{Error, Result};
pub use hash::{hash_document, MessageDigest};
pub use params::{
    generate_parameters, CancellationToken, ParameterConfig, ParameterGenerator, SearchBudget,
    SearchStats,
};
pub use prime::{MillerRabin, PrimalityTest};
pub use sign::{sign, Signer};
pub use types::{DomainParameters, KeyPair, PrivateKey, PublicKey, Signature, VerificationKey};
pub use verify::{verify, Verifier};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate a key pair for `domain`
pub use keygen::generate as generate_keypair;

#[cfg(test)]
pub(crate) mod testing {
    use crate::{DomainParameters, KeyPair, ParameterConfig, ParameterGenerator, PrivateKey, PublicKey};
    use num_bigint_dig::BigUint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::sync::OnceLock;

    /// p = 23, q = 11, g = 4
    pub fn toy_domain() -> DomainParameters {
        DomainParameters::new(23u32.into(), 11u32.into(), 4u32.into())
    }

    /// a = 3, h = 4^3 mod 23 = 18
    pub fn toy_keypair() -> KeyPair {
        KeyPair {
            private: PrivateKey::new(BigUint::from(3u32)),
            public: PublicKey::new(BigUint::from(18u32)),
        }
    }

    /// 32-bit q, 64-bit p
    pub fn small_config() -> ParameterConfig {
        ParameterConfig::new(32, 32, 64, 64, 64).unwrap()
    }

    /// Generated once from `small_config` under a fixed seed
    pub fn small_domain() -> DomainParameters {
        static DOMAIN: OnceLock<DomainParameters> = OnceLock::new();
        DOMAIN
            .get_or_init(|| {
                let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);
                ParameterGenerator::new(small_config())
                    .generate(&mut rng)
                    .unwrap()
            })
            .clone()
    }
}
