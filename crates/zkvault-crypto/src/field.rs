//! Field element encoding at the protocol boundary.
//!
//! Every value crossing the boundary is a non-negative integer strictly below
//! the BLS12-381 scalar modulus. Text forms are decimal or `0x`-prefixed
//! big-endian hex. Inputs at or above the modulus are rejected rather than
//! reduced, so two different strings never name the same element.
//!
//! Inside the hashes each note component is encoded as 31 little-endian bytes
//! ([`to_le_bytes_31`]); anything that does not fit in 248 bits is rejected.

use ark_bls12_381::Fr;
use ark_ff::{BigInteger, BigInteger256, PrimeField};

use crate::{CryptoError, Result};

/// A protocol field element.
pub type FieldElement = Fr;

/// Width of one half-note component in the commitment encoding.
pub const HALF_NOTE_BYTES: usize = 31;

/// Default width used by [`to_hex`] callers that format 32-byte words.
pub const WORD_BYTES: usize = 32;

/// Parse a decimal or `0x`-prefixed hex string into a field element.
///
/// # Errors
///
/// - [`CryptoError::UnsupportedInput`] if the string is empty, contains
///   anything but digits after the optional prefix (whitespace included),
///   or encodes a value `>= r`
pub fn parse_field(input: &str) -> Result<Fr> {
    let limbs = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(digits) => parse_hex_limbs(digits)?,
        None => parse_decimal_limbs(input)?,
    };
    Fr::from_bigint(BigInteger256::new(limbs))
        .ok_or_else(|| CryptoError::UnsupportedInput(format!("{input} exceeds field modulus")))
}

fn parse_decimal_limbs(digits: &str) -> Result<[u64; 4]> {
    if digits.is_empty() {
        return Err(CryptoError::UnsupportedInput("empty numeric string".into()));
    }
    let mut limbs = [0u64; 4];
    for ch in digits.chars() {
        let digit = ch
            .to_digit(10)
            .ok_or_else(|| CryptoError::UnsupportedInput(format!("invalid decimal digit {ch:?}")))?;
        let mut carry = u128::from(digit);
        for limb in limbs.iter_mut() {
            let wide = u128::from(*limb) * 10 + carry;
            *limb = wide as u64;
            carry = wide >> 64;
        }
        if carry != 0 {
            return Err(CryptoError::UnsupportedInput(
                "decimal value exceeds 256 bits".into(),
            ));
        }
    }
    Ok(limbs)
}

fn parse_hex_limbs(digits: &str) -> Result<[u64; 4]> {
    if digits.is_empty() {
        return Err(CryptoError::UnsupportedInput("empty hex string".into()));
    }
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let be = hex::decode(&padded)
        .map_err(|e| CryptoError::UnsupportedInput(format!("invalid hex: {e}")))?;
    let significant: Vec<u8> = be.iter().copied().skip_while(|b| *b == 0).collect();
    if significant.len() > 32 {
        return Err(CryptoError::UnsupportedInput(
            "hex value exceeds 256 bits".into(),
        ));
    }
    let mut le = [0u8; 32];
    for (i, byte) in significant.iter().rev().enumerate() {
        le[i] = *byte;
    }
    Ok(le_bytes_to_limbs(&le))
}

fn le_bytes_to_limbs(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.chunks(8).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        limbs[i] = u64::from_le_bytes(word);
    }
    limbs
}

/// Canonical little-endian bytes of a field element.
pub fn to_le_bytes(value: &Fr) -> [u8; 32] {
    let bytes = value.into_bigint().to_bytes_le();
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(&bytes);
    out
}

/// Decimal representation of a field element.
pub fn to_decimal(value: &Fr) -> String {
    value.into_bigint().to_string()
}

/// `0x`-prefixed big-endian hex, left-padded with zeros to `width` bytes.
///
/// # Errors
///
/// - [`CryptoError::UnsupportedInput`] if the value needs more than `width` bytes
pub fn to_hex(value: &Fr, width: usize) -> Result<String> {
    let mut be = to_le_bytes(value);
    be.reverse();
    let significant: Vec<u8> = be.iter().copied().skip_while(|b| *b == 0).collect();
    if significant.len() > width {
        return Err(CryptoError::UnsupportedInput(format!(
            "value needs {} bytes, width is {width}",
            significant.len()
        )));
    }
    let mut padded = vec![0u8; width - significant.len()];
    padded.extend_from_slice(&significant);
    Ok(format!("0x{}", hex::encode(padded)))
}

/// Encode a note component as 31 little-endian bytes.
///
/// # Errors
///
/// - [`CryptoError::UnsupportedInput`] if the value is `>= 2^248`
pub fn to_le_bytes_31(value: &Fr) -> Result<[u8; HALF_NOTE_BYTES]> {
    let bytes = to_le_bytes(value);
    if bytes[HALF_NOTE_BYTES] != 0 {
        return Err(CryptoError::UnsupportedInput(
            "note component does not fit in 31 bytes".into(),
        ));
    }
    let mut out = [0u8; HALF_NOTE_BYTES];
    out.copy_from_slice(&bytes[..HALF_NOTE_BYTES]);
    Ok(out)
}

/// Decode a 31-byte little-endian note component.
///
/// Any 248-bit value is below the modulus, so this cannot fail.
pub fn from_le_bytes_31(bytes: &[u8; HALF_NOTE_BYTES]) -> Fr {
    Fr::from_le_bytes_mod_order(bytes)
}

/// Serde adapter storing a field element as a decimal string.
pub mod decimal {
    use ark_bls12_381::Fr;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_decimal(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fr, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_field(&text).map_err(D::Error::custom)
    }
}

/// Serde adapter for a sequence of decimal-string field elements.
pub mod decimal_vec {
    use ark_bls12_381::Fr;
    use serde::de::Error;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[Fr], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&super::to_decimal(value))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Fr>, D::Error> {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts
            .iter()
            .map(|t| super::parse_field(t).map_err(D::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, Zero};
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_parse_decimal_and_hex_agree() {
        let a = parse_field("123456789").expect("decimal");
        let b = parse_field("0x75bcd15").expect("hex");
        assert_eq!(a, b);
        assert_eq!(a, Fr::from(123_456_789u64));
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(parse_field("0").expect("zero"), Fr::zero());
        assert_eq!(parse_field("0x00").expect("zero hex"), Fr::zero());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_field("").is_err());
        assert!(parse_field("xyz").is_err());
        assert!(parse_field("0x").is_err());
        assert!(parse_field("0xzz").is_err());
        assert!(parse_field("-1").is_err());
    }

    #[test]
    fn test_parse_rejects_surrounding_whitespace() {
        for input in [" 42 ", "42\n", "\t42", " 0x2a", "0x2a "] {
            assert!(
                matches!(parse_field(input), Err(CryptoError::UnsupportedInput(_))),
                "{input:?} should be rejected"
            );
        }
        assert_eq!(parse_field("42").expect("bare"), Fr::from(42u64));
    }

    #[test]
    fn test_parse_rejects_modulus() {
        let modulus = Fr::MODULUS.to_string();
        assert!(parse_field(&modulus).is_err());

        let minus_one = to_decimal(&(Fr::zero() - Fr::one()));
        assert_eq!(
            parse_field(&minus_one).expect("r - 1 is in range"),
            Fr::zero() - Fr::one()
        );
    }

    #[test]
    fn test_parse_rejects_more_than_256_bits() {
        let huge = "1".repeat(90);
        assert!(parse_field(&huge).is_err());
        let huge_hex = format!("0x{}", "f".repeat(66));
        assert!(parse_field(&huge_hex).is_err());
    }

    #[test]
    fn test_to_hex_padding() {
        let v = Fr::from(42u64);
        assert_eq!(to_hex(&v, 2).expect("fits"), "0x002a");
        let word = to_hex(&Fr::from(123_456_789u64), WORD_BYTES).expect("fits");
        assert_eq!(word.len(), 2 + 64);
        assert!(word.ends_with("075bcd15"));
    }

    #[test]
    fn test_to_hex_rejects_narrow_width() {
        assert!(to_hex(&Fr::from(0x1_0000u64), 2).is_err());
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(&Fr::from(789u64)), "789");
        assert_eq!(to_decimal(&Fr::zero()), "0");
    }

    #[test]
    fn test_le_31_encoding() {
        let v = Fr::from(0x0102u64);
        let bytes = to_le_bytes_31(&v).expect("fits");
        assert_eq!(bytes[0], 0x02);
        assert_eq!(bytes[1], 0x01);
        assert!(bytes[2..].iter().all(|b| *b == 0));
        assert_eq!(from_le_bytes_31(&bytes), v);
    }

    #[test]
    fn test_le_31_rejects_wide_values() {
        let mut le = [0u8; 32];
        le[31] = 0x01;
        let wide = Fr::from_le_bytes_mod_order(&le);
        assert!(to_le_bytes_31(&wide).is_err());
    }

    #[test]
    fn test_decimal_serde() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            #[serde(with = "decimal")]
            value: Fr,
            #[serde(with = "decimal_vec")]
            values: Vec<Fr>,
        }

        let w = Wrapper {
            value: Fr::from(456u64),
            values: vec![Fr::from(1u64), Fr::from(2u64)],
        };
        let json = serde_json::to_string(&w).expect("serialize");
        assert_eq!(json, r#"{"value":"456","values":["1","2"]}"#);
        let back: Wrapper = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.value, w.value);
        assert_eq!(back.values, w.values);
    }
}
