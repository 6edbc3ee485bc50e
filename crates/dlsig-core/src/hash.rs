//! Document digests
//!
//! Documents are hashed with SHA-1 and the 160-bit output is read as a
//! big-endian integer.

use crate::{Error, Result};
use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

/// Width of the digest space in bits
pub const DIGEST_BITS: usize = 160;

/// Integer digest of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDigest(#[serde(with = "crate::types::decimal_serde")] BigUint);

impl MessageDigest {
    /// Wrap an integer digest
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    /// Interpret big-endian bytes as a digest
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }

    /// Parse a hex-encoded digest
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| Error::Deserialization(format!("Invalid digest hex: {}", e)))?;
        Ok(Self::from_bytes_be(&bytes))
    }

    /// Borrow the integer value
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl From<BigUint> for MessageDigest {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl fmt::Display for MessageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_str_radix(10))
    }
}

/// Hash document content into a [`MessageDigest`]
pub fn hash_document(bytes: &[u8]) -> MessageDigest {
    let digest = Sha1::digest(bytes);
    MessageDigest::from_bytes_be(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_document_known_vector() {
        let digest = hash_document(b"abc");
        let expected =
            MessageDigest::from_hex("a9993e364706816aba3e25717850c26c9cd0d89d").unwrap();
        assert_eq!(digest, expected);
        assert!(digest.value().bits() <= DIGEST_BITS);
    }

    #[test]
    fn test_hash_document_distinguishes_content() {
        assert_ne!(hash_document(b"document one"), hash_document(b"document two"));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(matches!(
            MessageDigest::from_hex("not-hex"),
            Err(Error::Deserialization(_))
        ));
    }

    #[test]
    fn test_display_is_decimal() {
        assert_eq!(MessageDigest::new(BigUint::from(255u32)).to_string(), "255");
    }
}
