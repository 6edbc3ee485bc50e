//! Core types for the signature scheme

use crate::arith::mod_pow;
use crate::{Error, Result};
use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Shared group description `(p, q, g)`
///
/// `q` divides `p - 1` and `g` generates the subgroup of order `q` in Z*_p.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainParameters {
    /// Field prime
    #[serde(with = "decimal_serde")]
    pub p: BigUint,
    /// Subgroup order
    #[serde(with = "decimal_serde")]
    pub q: BigUint,
    /// Subgroup generator
    #[serde(with = "decimal_serde")]
    pub g: BigUint,
}

impl DomainParameters {
    /// Wrap an existing triple without checking it
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Self {
        Self { p, q, g }
    }

    /// Check the structural group invariants.
    ///
    /// Requires `q | p - 1`, `1 < g < p` and `g^q = 1 (mod p)`. Primality and
    /// bit lengths are checked by `DomainParameters::validate` in `params`.
    pub fn validate_group(&self) -> Result<()> {
        if self.p <= BigUint::one() || self.q <= BigUint::one() {
            return Err(Error::InvalidParameters("p and q must exceed 1".into()));
        }
        if !((&self.p - BigUint::one()) % &self.q).is_zero() {
            return Err(Error::InvalidParameters("q does not divide p - 1".into()));
        }
        if self.g <= BigUint::one() || self.g >= self.p {
            return Err(Error::InvalidParameters("g must lie in (1, p)".into()));
        }
        if !mod_pow(&self.g, &self.q, &self.p)?.is_one() {
            return Err(Error::InvalidParameters(
                "g does not have order q modulo p".into(),
            ));
        }
        Ok(())
    }
}

/// Private exponent `a` in `[2, q - 1]`
///
/// Wiped on drop; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(#[serde(with = "decimal_serde")] BigUint);

impl PrivateKey {
    /// Wrap a raw exponent
    pub fn new(a: BigUint) -> Self {
        Self(a)
    }

    /// Borrow the raw exponent
    pub fn expose(&self) -> &BigUint {
        &self.0
    }

    /// Derive the matching public value `h = g^a mod p`
    pub fn public_key(&self, domain: &DomainParameters) -> Result<PublicKey> {
        Ok(PublicKey(mod_pow(&domain.g, &self.0, &domain.p)?))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Public value `h = g^a mod p`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "decimal_serde")] BigUint);

impl PublicKey {
    /// Wrap a raw public value
    pub fn new(h: BigUint) -> Self {
        Self(h)
    }

    /// Borrow the raw public value
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Check `1 < h < p` and that `h` lies in the order-`q` subgroup
    pub fn validate(&self, domain: &DomainParameters) -> Result<()> {
        if self.0 <= BigUint::one() || self.0 >= domain.p {
            return Err(Error::InvalidParameters("h must lie in (1, p)".into()));
        }
        if !mod_pow(&self.0, &domain.q, &domain.p)?.is_one() {
            return Err(Error::InvalidParameters(
                "h is not in the order-q subgroup".into(),
            ));
        }
        Ok(())
    }
}

/// Key pair produced by `keygen::generate`
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// Secret exponent, owned by whoever signs
    pub private: PrivateKey,
    /// Public value, freely shareable
    pub public: PublicKey,
}

/// Everything a verifier needs: `(p, q, g, h)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// Domain parameters
    #[serde(flatten)]
    pub domain: DomainParameters,
    /// Signer's public value
    #[serde(rename = "h")]
    pub public: PublicKey,
}

impl VerificationKey {
    /// Bundle domain parameters with a public value
    pub fn new(domain: DomainParameters, public: PublicKey) -> Self {
        Self { domain, public }
    }
}

/// Signature pair `(c1, c2)`, both in `[1, q - 1]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// First component, `(g^r mod p) mod q`
    #[serde(with = "decimal_serde")]
    pub c1: BigUint,
    /// Second component
    #[serde(with = "decimal_serde")]
    pub c2: BigUint,
}

impl Signature {
    /// Create a new signature
    pub fn new(c1: BigUint, c2: BigUint) -> Self {
        Self { c1, c2 }
    }

    /// Fail with [`Error::InvalidSignature`] unless both components are in `[1, q - 1]`
    pub fn check_range(&self, q: &BigUint) -> Result<()> {
        let in_range = |c: &BigUint| !c.is_zero() && c < q;
        if in_range(&self.c1) && in_range(&self.c2) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

/// Serde adapter carrying big integers as decimal strings
pub(crate) mod decimal_serde {
    use num_bigint_dig::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        crate::encoding::parse_decimal(text.trim())
            .ok_or_else(|| serde::de::Error::custom("Invalid decimal integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::toy_domain;

    #[test]
    fn test_validate_group_accepts_toy_domain() {
        toy_domain().validate_group().unwrap();
    }

    #[test]
    fn test_validate_group_rejects_bad_generator() {
        let mut domain = toy_domain();
        domain.g = BigUint::one();
        assert!(domain.validate_group().is_err());

        // 5 has order 22 modulo 23
        domain.g = BigUint::from(5u32);
        assert!(domain.validate_group().is_err());
    }

    #[test]
    fn test_validate_group_rejects_non_divisor() {
        let domain = DomainParameters::new(
            BigUint::from(23u32),
            BigUint::from(7u32),
            BigUint::from(4u32),
        );
        assert!(matches!(
            domain.validate_group(),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_public_key_derivation() {
        let domain = toy_domain();
        let private = PrivateKey::new(BigUint::from(3u32));
        let public = private.public_key(&domain).unwrap();
        assert_eq!(public.value(), &BigUint::from(18u32));
        public.validate(&domain).unwrap();
        assert!(PublicKey::new(BigUint::from(5u32)).validate(&domain).is_err());
    }

    #[test]
    fn test_private_key_debug_is_redacted() {
        let private = PrivateKey::new(BigUint::from(123_456_789u32));
        assert!(!format!("{:?}", private).contains("123456789"));
    }

    #[test]
    fn test_signature_range() {
        let q = BigUint::from(11u32);
        assert!(Signature::new(1u32.into(), 10u32.into()).check_range(&q).is_ok());
        assert!(Signature::new(0u32.into(), 3u32.into()).check_range(&q).is_err());
        assert!(Signature::new(3u32.into(), 11u32.into()).check_range(&q).is_err());
    }

    #[test]
    fn test_json_uses_decimal_strings() {
        let key = VerificationKey::new(toy_domain(), PublicKey::new(BigUint::from(18u32)));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"p":"23","q":"11","g":"4","h":"18"}"#);
        let back: VerificationKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_json_rejects_non_decimal_strings() {
        for c1 in ["+8", "8_0", "0x8", "-8", ""] {
            let json = format!(r#"{{"c1":"{}","c2":"1"}}"#, c1);
            assert!(serde_json::from_str::<Signature>(&json).is_err(), "{:?}", c1);
        }
        let sig: Signature = serde_json::from_str(r#"{"c1":"8","c2":"1"}"#).unwrap();
        assert_eq!(sig, Signature::new(8u32.into(), 1u32.into()));
    }
}
