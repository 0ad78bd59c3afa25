//! Project addresses
//!
//! Every trust domain in Tessera (a project, the administrator, an
//! authorized reader) is identified by an opaque 32-byte address. Addresses
//! are assigned by the deployment substrate; the core only compares and
//! stores them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque 32-byte address of a project or account.
///
/// Displayed and parsed as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    /// Length of an address in bytes.
    pub const LENGTH: usize = 32;

    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derive a stable address from a label.
    ///
    /// The label bytes are tiled across the address. This is a fixture and
    /// documentation convenience, not a cryptographic derivation; real
    /// deployments receive addresses from the substrate.
    pub fn derived(label: &str) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        let src = label.as_bytes();
        if !src.is_empty() {
            for (i, b) in bytes.iter_mut().enumerate() {
                *b = src[i % src.len()];
            }
        }
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    /// Hex rendering without the `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AddressParseError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(stripped)?;
        let bytes: [u8; Self::LENGTH] = raw
            .try_into()
            .map_err(|v: Vec<u8>| AddressParseError::BadLength(v.len()))?;
        Ok(Self(bytes))
    }
}

/// Failure to parse an [`Address`] from text.
#[derive(Debug, thiserror::Error)]
pub enum AddressParseError {
    /// The input was not valid hex.
    #[error("invalid hex: {0}")]
    BadHex(#[from] hex::FromHexError),

    /// The input decoded to the wrong number of bytes.
    #[error("expected 32 bytes, got {0}")]
    BadLength(usize),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; Address::LENGTH]> for Address {
    fn from(bytes: [u8; Address::LENGTH]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let addr = Address::derived("acme");
        let parsed: Address = addr.to_string().parse().expect("round trip");
        assert_eq!(addr, parsed);
    }

    #[test]
    fn from_hex_accepts_bare_and_prefixed() {
        let addr = Address::derived("bolt");
        assert_eq!(Address::from_hex(&addr.to_hex()).unwrap(), addr);
        assert_eq!(Address::from_hex(&addr.to_string()).unwrap(), addr);
    }

    #[test]
    fn from_hex_rejects_short_input() {
        assert!(matches!(
            Address::from_hex("0xabcd"),
            Err(AddressParseError::BadLength(2))
        ));
    }

    #[test]
    fn derived_is_stable_and_distinct() {
        assert_eq!(Address::derived("acme"), Address::derived("acme"));
        assert_ne!(Address::derived("acme"), Address::derived("bolt"));
    }
}
