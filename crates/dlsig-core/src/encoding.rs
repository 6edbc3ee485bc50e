//! Minimal interchange form: newline-delimited decimal integers
//!
//! | value               | lines            |
//! |---------------------|------------------|
//! | [`DomainParameters`]| `p`, `q`, `g`    |
//! | [`VerificationKey`] | `p`, `q`, `g`, `h` |
//! | [`PrivateKey`]      | `a`              |
//! | [`Signature`]       | `c1`, `c2`       |

use crate::{DomainParameters, Error, PrivateKey, PublicKey, Result, Signature, VerificationKey};
use num_bigint_dig::BigUint;

/// Conversion to and from the decimal line format
pub trait DecimalLines: Sized {
    /// Render as one decimal integer per line
    fn to_decimal_lines(&self) -> String;

    /// Parse from one decimal integer per line
    fn from_decimal_lines(text: &str) -> Result<Self>;
}

fn render(values: &[&BigUint]) -> String {
    let mut out = String::new();
    for value in values {
        out.push_str(&value.to_str_radix(10));
        out.push('\n');
    }
    out
}

/// Parse a string of ASCII digits only; signs, separators and radix
/// prefixes are refused
pub(crate) fn parse_decimal(text: &str) -> Option<BigUint> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(text.as_bytes(), 10)
}

fn parse(text: &str, names: &[&str]) -> Result<Vec<BigUint>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() != names.len() {
        return Err(Error::Deserialization(format!(
            "Expected {} lines ({}), found {}",
            names.len(),
            names.join(", "),
            lines.len()
        )));
    }

    lines
        .iter()
        .zip(names)
        .map(|(line, name)| {
            parse_decimal(line).ok_or_else(|| {
                Error::Deserialization(format!("Invalid decimal value for {}", name))
            })
        })
        .collect()
}

impl DecimalLines for DomainParameters {
    fn to_decimal_lines(&self) -> String {
        render(&[&self.p, &self.q, &self.g])
    }

    fn from_decimal_lines(text: &str) -> Result<Self> {
        let mut values = parse(text, &["p", "q", "g"])?.into_iter();
        match (values.next(), values.next(), values.next()) {
            (Some(p), Some(q), Some(g)) => Ok(Self::new(p, q, g)),
            _ => Err(Error::Deserialization("Missing domain parameter".into())),
        }
    }
}

impl DecimalLines for VerificationKey {
    fn to_decimal_lines(&self) -> String {
        let d = &self.domain;
        render(&[&d.p, &d.q, &d.g, self.public.value()])
    }

    fn from_decimal_lines(text: &str) -> Result<Self> {
        let mut values = parse(text, &["p", "q", "g", "h"])?.into_iter();
        match (values.next(), values.next(), values.next(), values.next()) {
            (Some(p), Some(q), Some(g), Some(h)) => Ok(Self::new(
                DomainParameters::new(p, q, g),
                PublicKey::new(h),
            )),
            _ => Err(Error::Deserialization("Missing verification key value".into())),
        }
    }
}

impl DecimalLines for PrivateKey {
    fn to_decimal_lines(&self) -> String {
        render(&[self.expose()])
    }

    fn from_decimal_lines(text: &str) -> Result<Self> {
        parse(text, &["a"])?
            .pop()
            .map(PrivateKey::new)
            .ok_or_else(|| Error::Deserialization("Missing private exponent".into()))
    }
}

impl DecimalLines for Signature {
    fn to_decimal_lines(&self) -> String {
        render(&[&self.c1, &self.c2])
    }

    fn from_decimal_lines(text: &str) -> Result<Self> {
        let mut values = parse(text, &["c1", "c2"])?.into_iter();
        match (values.next(), values.next()) {
            (Some(c1), Some(c2)) => Ok(Self::new(c1, c2)),
            _ => Err(Error::Deserialization("Missing signature component".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{toy_domain, toy_keypair};

    #[test]
    fn test_verification_key_layout() {
        let key = VerificationKey::new(toy_domain(), toy_keypair().public);
        assert_eq!(key.to_decimal_lines(), "23\n11\n4\n18\n");
        assert_eq!(VerificationKey::from_decimal_lines("23\n11\n4\n18").unwrap(), key);
    }

    #[test]
    fn test_tolerates_crlf_and_trailing_blank_lines() {
        let sig = Signature::from_decimal_lines("8\r\n1\r\n\r\n").unwrap();
        assert_eq!(sig, Signature::new(8u32.into(), 1u32.into()));
        let domain = DomainParameters::from_decimal_lines(" 23 \n11\n4\n").unwrap();
        assert_eq!(domain, toy_domain());
    }

    #[test]
    fn test_private_key_roundtrip() {
        let key = toy_keypair().private;
        let text = key.to_decimal_lines();
        assert_eq!(text, "3\n");
        assert_eq!(PrivateKey::from_decimal_lines(&text).unwrap(), key);
    }

    #[test]
    fn test_rejects_missing_and_extra_lines() {
        assert!(matches!(
            VerificationKey::from_decimal_lines("23\n11\n4\n"),
            Err(Error::Deserialization(_))
        ));
        assert!(Signature::from_decimal_lines("1\n2\n3\n").is_err());
        assert!(PrivateKey::from_decimal_lines("").is_err());
    }

    #[test]
    fn test_rejects_non_decimal() {
        assert!(Signature::from_decimal_lines("0x10\n2\n").is_err());
        assert!(Signature::from_decimal_lines("-5\n2\n").is_err());
        assert!(Signature::from_decimal_lines("+5\n2\n").is_err());
        assert!(Signature::from_decimal_lines("1_000\n2\n").is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0042"), Some(BigUint::from(42u32)));
        for bad in ["", "+1", "-1", "1_0", "0x1", "1 2", "١"] {
            assert_eq!(parse_decimal(bad), None, "{:?}", bad);
        }
    }
}
