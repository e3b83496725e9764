//! Canonical Ethereum address handling.
//!
//! Uses `alloy_primitives::Address` as the underlying 20-byte value. The
//! canonical textual form stored and compared everywhere in this crate is
//! lowercase hex with a literal `0x` prefix; EIP-55 checksumming is offered
//! only as a display convenience.

use alloy_primitives::Address as AlloyAddress;
use k256::ecdsa::VerifyingKey;

use crate::error::Error;

/// Ethereum address (20 bytes).
///
/// `Display` renders the canonical lowercase `0x`-prefixed form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(AlloyAddress);

impl Address {
    /// Create from raw 20-byte address.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(AlloyAddress::new(bytes))
    }

    /// Derive the address of a secp256k1 public key.
    ///
    /// Hashes the 64-byte uncompressed point (x and y coordinates, without
    /// the 0x04 tag) with keccak256 and keeps the last 20 bytes.
    pub fn from_public_key(public_key: &VerifyingKey) -> Self {
        let point = public_key.to_encoded_point(false);
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&point.as_bytes()[1..]);
        Self(AlloyAddress::from_raw_public_key(&raw))
    }

    /// Normalize an address string to its canonical form.
    ///
    /// Accepts the 40 hex characters with or without a `0x`/`0X` prefix and
    /// in any letter case. Anything else is [`Error::MalformedAddress`];
    /// input is never truncated or padded.
    pub fn normalize(s: &str) -> Result<Self, Error> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 40 {
            return Err(Error::MalformedAddress(s.to_string()));
        }

        let bytes = hex::decode(digits).map_err(|_| Error::MalformedAddress(s.to_string()))?;
        let mut raw = [0u8; 20];
        raw.copy_from_slice(&bytes);
        Ok(Self(AlloyAddress::new(raw)))
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        self.0.as_ref()
    }

    /// Render the EIP-55 checksummed form.
    pub fn to_checksum_string(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl core::fmt::Debug for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Address({self})")
    }
}

impl core::str::FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::normalize(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(AlloyAddress::new(bytes))
    }
}

impl From<Address> for [u8; 20] {
    fn from(addr: Address) -> Self {
        *addr.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ADDR_LOWER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
    const TEST_ADDR_CHECKSUM: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn normalize_is_case_insensitive() {
        let lower: Address = TEST_ADDR_LOWER.parse().unwrap();
        let checksum: Address = TEST_ADDR_CHECKSUM.parse().unwrap();
        let upper: Address = TEST_ADDR_LOWER.to_uppercase().replace("0X", "0x").parse().unwrap();
        assert_eq!(lower, checksum);
        assert_eq!(lower, upper);
    }

    #[test]
    fn normalize_accepts_unprefixed() {
        let addr: Address = "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(addr.to_string(), TEST_ADDR_LOWER);
    }

    #[test]
    fn display_is_canonical_lowercase() {
        let addr: Address = TEST_ADDR_CHECKSUM.parse().unwrap();
        assert_eq!(addr.to_string(), TEST_ADDR_LOWER);
        assert_eq!(addr.to_string().len(), 42);
    }

    #[test]
    fn checksum_rendering() {
        let addr: Address = TEST_ADDR_LOWER.parse().unwrap();
        assert_eq!(addr.to_checksum_string(), TEST_ADDR_CHECKSUM);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            Address::normalize("0x1234"),
            Err(Error::MalformedAddress(_))
        ));
        assert!(matches!(
            Address::normalize(&format!("{TEST_ADDR_LOWER}00")),
            Err(Error::MalformedAddress(_))
        ));
    }

    #[test]
    fn rejects_non_hex() {
        let bad = "0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed";
        assert!(matches!(
            Address::normalize(bad),
            Err(Error::MalformedAddress(_))
        ));
    }

    #[test]
    fn from_public_key_matches_known_key() {
        // Key 0x4c0883..2318 owns 0x2c7536e3605d9c16a7a3d7b1898e529396a65c23.
        let key = k256::ecdsa::SigningKey::from_slice(&hex_literal::hex!(
            "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
        ))
        .unwrap();
        let addr = Address::from_public_key(key.verifying_key());
        assert_eq!(addr.to_string(), "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23");
    }
}
