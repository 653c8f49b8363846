//! Normalized EVM address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte EVM address stored as a lowercase `0x…` hex string.
///
/// Addresses arrive from the chain in mixed (checksum) case; the mirror
/// stores and compares them lowercased so that natural-key lookups and
/// by-address queries never miss on case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvmAddress(String);

impl EvmAddress {
    /// Create an address from a raw string, normalizing to lowercase.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_lowercase())
    }

    /// The zero address, used by token contracts for mint/burn endpoints.
    pub fn zero() -> Self {
        Self("0x0000000000000000000000000000000000000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Well-formed means `0x` prefix followed by 40 hex digits.
    pub fn is_valid(&self) -> bool {
        self.0.len() == 42
            && self.0.starts_with("0x")
            && self.0[2..].chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EvmAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lowercases_checksummed_input() {
        let addr = EvmAddress::new("0xF977814e90dA44bFA03b6295A0616a897441aceC");
        assert_eq!(addr.as_str(), "0xf977814e90da44bfa03b6295a0616a897441acec");
    }

    #[test]
    fn equality_ignores_original_case() {
        let a = EvmAddress::new("0xAbC0000000000000000000000000000000000001");
        let b = EvmAddress::new("0xabc0000000000000000000000000000000000001");
        assert_eq!(a, b);
    }

    #[test]
    fn validity_checks_length_and_hex() {
        assert!(EvmAddress::zero().is_valid());
        assert!(!EvmAddress::new("0x1234").is_valid());
        assert!(!EvmAddress::new("0xzz00000000000000000000000000000000000000").is_valid());
    }
}
