//! # Digest — 32-Byte SHA-256 Values
//!
//! Defines `Digest`, the raw 32-byte hash value used for identity
//! commitments, nullifier hashes, and payload content digests.
//!
//! ## Wire Format
//!
//! In memory a digest is `[u8; 32]`. In every serialized form (JSON,
//! database columns, public proof signals) it is a 64-character lowercase
//! hex string. Parsing is strict: wrong length or non-hex input is
//! rejected, never coerced.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256};

use crate::error::CoreError;

/// A 32-byte SHA-256 digest.
///
/// Serializes as a 64-char lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Create a digest from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string (64 chars).
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a digest from a 64-character hex string.
    ///
    /// Accepts upper- or lowercase input and surrounding whitespace;
    /// anything else is rejected.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        let hex = hex.trim().to_lowercase();
        if hex.len() != 64 {
            return Err(CoreError::InvalidDigest(format!(
                "expected 64 hex chars, got {}",
                hex.len()
            )));
        }
        // Only ASCII hex digits pass, so chunk boundaries are character
        // boundaries and per-chunk parsing cannot admit signs or spaces.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidDigest(
                "non-hex character in digest".to_string(),
            ));
        }
        let mut out = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let s = std::str::from_utf8(chunk)
                .map_err(|e| CoreError::InvalidDigest(format!("invalid hex: {e}")))?;
            out[i] = u8::from_str_radix(s, 16)
                .map_err(|e| CoreError::InvalidDigest(format!("invalid hex at byte {i}: {e}")))?;
        }
        Ok(Self(out))
    }

    /// Whether a string is a well-formed digest encoding.
    pub fn is_valid_hex(s: &str) -> bool {
        let s = s.trim();
        s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute the SHA-256 digest of raw bytes.
///
/// This is the plain, untagged hash used for content addressing (payload
/// digests, anchor leaves). Protocol-level hashing (commitments,
/// nullifiers, proof blobs) uses domain-separated variants in `veil-proof`.
pub fn sha256(data: &[u8]) -> Digest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Digest::from_bytes(bytes)
}
