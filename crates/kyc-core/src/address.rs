//! 20-byte account addresses and their EIP-55 checksummed text form.

use std::{fmt, str::FromStr};

use sha3::{Digest, Keccak256};

use crate::error::AddressError;

/// A blockchain account identifier.
///
/// Equality is byte equality, so two textual forms that differ only in
/// letter case compare equal once parsed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
  pub fn is_zero(&self) -> bool { self.0 == [0; 20] }

  /// Parse `0x`-prefixed (or bare) hex of any letter case.
  pub fn parse(input: &str) -> Result<Self, AddressError> {
    let trimmed = input.trim();
    let digits = trimmed
      .strip_prefix("0x")
      .or_else(|| trimmed.strip_prefix("0X"))
      .unwrap_or(trimmed);

    if digits.len() != 40 {
      return Err(AddressError::InvalidLength(digits.len()));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes)
      .map_err(|_| AddressError::InvalidHex)?;
    Ok(Self(bytes))
  }

  /// The EIP-55 mixed-case checksummed rendering, `0x`-prefixed.
  pub fn to_checksum(&self) -> String {
    let lower = hex::encode(self.0);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
      let byte = hash[i / 2];
      let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
      if c.is_ascii_alphabetic() && nibble >= 8 {
        out.push(c.to_ascii_uppercase());
      } else {
        out.push(c);
      }
    }
    out
  }
}

impl FromStr for Address {
  type Err = AddressError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl fmt::Display for Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_checksum())
  }
}

impl fmt::Debug for Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Address({})", self.to_checksum())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // Reference vectors from EIP-55.
  const CHECKSUMMED: [&str; 4] = [
    "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
    "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
    "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
    "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
  ];

  #[test]
  fn checksum_matches_reference_vectors() {
    for expected in CHECKSUMMED {
      let addr = Address::parse(&expected.to_lowercase()).unwrap();
      assert_eq!(addr.to_string(), expected);
    }
  }

  #[test]
  fn parse_ignores_case_and_prefix() {
    let a = Address::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
    let b = Address::parse("5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn parse_rejects_wrong_length() {
    assert_eq!(
      Address::parse("0x1234"),
      Err(AddressError::InvalidLength(4))
    );
    assert_eq!(Address::parse(""), Err(AddressError::InvalidLength(0)));
  }

  #[test]
  fn parse_rejects_non_hex() {
    let input = "0xzzzeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    assert_eq!(Address::parse(input), Err(AddressError::InvalidHex));
  }

  #[test]
  fn zero_address() {
    let zero = Address::parse("0x0000000000000000000000000000000000000000").unwrap();
    assert!(zero.is_zero());
    assert!(!Address::parse(CHECKSUMMED[0]).unwrap().is_zero());
  }
}
