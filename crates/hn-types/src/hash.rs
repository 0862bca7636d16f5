use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::TypeError;

/// Content address of a code fragment: the first 20 bytes (160 bits) of the
/// SHA-256 digest of its canonical body.
///
/// Displayed as 40 lowercase hex characters. Identical canonical bodies
/// always produce the same `Hash40`, making fragments deduplicatable and
/// verifiable. Immutable once computed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash40([u8; 20]);

impl Hash40 {
    /// Length of the hex representation.
    pub const HEX_LEN: usize = 40;

    /// Compute the `Hash40` of a canonical fragment body.
    pub fn of_body(body: &[u8]) -> Self {
        let digest = Sha256::digest(body);
        let mut truncated = [0u8; 20];
        truncated.copy_from_slice(&digest[..20]);
        Self(truncated)
    }

    /// Full SHA-256 digest of a canonical body as 64 lowercase hex chars.
    ///
    /// Stored in the `hash` header field; a `Hash40` is its 40-char prefix.
    pub fn full_digest_hex(body: &[u8]) -> String {
        hex::encode(Sha256::digest(body))
    }

    /// Parse from exactly 40 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::HEX_LEN,
                actual: s.len(),
            });
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The raw 20-byte truncated digest.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Hex-encoded string representation (40 lowercase chars).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Two-hex-character storage subdirectory name (first byte of the hash).
    pub fn subdir(&self) -> String {
        hex::encode(&self.0[..1])
    }
}

impl fmt::Debug for Hash40 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash40({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Hash40 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Hash40 {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_body_is_deterministic() {
        let body = b"function test($a) {\n    return $a + 1;\n}";
        assert_eq!(Hash40::of_body(body), Hash40::of_body(body));
    }

    #[test]
    fn of_body_matches_known_vector() {
        // sha256("function test($a) {\n    return $a + 1;\n}")
        //   = cf9a51c914fd6ef41e06ac4078f05373d000ee0b5c8b8b2fc70ea28d12654af9
        let body = b"function test($a) {\n    return $a + 1;\n}";
        let hash = Hash40::of_body(body);
        assert_eq!(hash.to_hex(), "cf9a51c914fd6ef41e06ac4078f05373d000ee0b");
        assert!(Hash40::full_digest_hex(body).starts_with(&hash.to_hex()));
    }

    #[test]
    fn different_bodies_produce_different_hashes() {
        assert_ne!(Hash40::of_body(b"aaa"), Hash40::of_body(b"bbb"));
    }

    #[test]
    fn hex_roundtrip() {
        let hash = Hash40::of_body(b"roundtrip");
        let parsed = Hash40::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let err = Hash40::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 40,
                actual: 4
            }
        );
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let err = Hash40::from_hex(&"z".repeat(40)).unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn subdir_is_first_two_hex_chars() {
        let hash = Hash40::from_hex("cf9a51c914fd6ef41e06ac4078f05373d000ee0b").unwrap();
        assert_eq!(hash.subdir(), "cf");
    }

    #[test]
    fn display_is_full_hex() {
        let hash = Hash40::of_body(b"display");
        let display = format!("{hash}");
        assert_eq!(display.len(), Hash40::HEX_LEN);
        assert_eq!(display, hash.to_hex());
    }

    #[test]
    fn from_str_parses() {
        let hash: Hash40 = "cf9a51c914fd6ef41e06ac4078f05373d000ee0b".parse().unwrap();
        assert_eq!(hash.subdir(), "cf");
    }

    #[test]
    fn serde_roundtrip() {
        let hash = Hash40::of_body(b"serde");
        let json = serde_json::to_string(&hash).unwrap();
        let parsed: Hash40 = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, parsed);
    }
}
