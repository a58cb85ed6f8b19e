//! # Proof Envelope
//!
//! The wire shape of an authorization proof: three public signals plus an
//! opaque backend-specific blob.
//!
//! ## Wire Format
//!
//! `public_signals` is always, in order: the commitment hex, the
//! nullifier hash hex, and the topic string. `proof_blob` serializes as
//! lowercase hex. Anything that deviates from this shape fails structural
//! validation and is rejected before any backend runs.

use serde::{Deserialize, Serialize};

use veil_core::{ActionScope, Commitment, NullifierHash};

/// Index of the commitment hex within the public signals.
const SIGNAL_COMMITMENT: usize = 0;
/// Index of the nullifier hash hex within the public signals.
const SIGNAL_NULLIFIER: usize = 1;
/// Index of the topic string within the public signals.
const SIGNAL_TOPIC: usize = 2;
/// Expected signal count.
const SIGNAL_COUNT: usize = 3;

/// An authorization proof as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Ordered public signals: commitment hex, nullifier hex, topic.
    pub public_signals: Vec<String>,
    /// Backend-specific evidence bytes, hex on the wire.
    #[serde(with = "hex_blob")]
    pub proof_blob: Vec<u8>,
}

impl Proof {
    /// Assemble a proof in canonical signal order.
    pub fn new(
        commitment: &Commitment,
        nullifier_hash: &NullifierHash,
        scope: &ActionScope,
        proof_blob: Vec<u8>,
    ) -> Self {
        Self {
            public_signals: vec![
                commitment.to_hex(),
                nullifier_hash.to_hex(),
                scope.topic.as_str().to_string(),
            ],
            proof_blob,
        }
    }

    /// Parse the commitment signal. `None` when absent or malformed.
    pub fn commitment(&self) -> Option<Commitment> {
        let raw = self.public_signals.get(SIGNAL_COMMITMENT)?;
        Commitment::from_hex(raw).ok()
    }

    /// Parse the nullifier hash signal. `None` when absent or malformed.
    pub fn nullifier_hash(&self) -> Option<NullifierHash> {
        let raw = self.public_signals.get(SIGNAL_NULLIFIER)?;
        NullifierHash::from_hex(raw).ok()
    }

    /// The topic signal. `None` when absent.
    pub fn topic(&self) -> Option<&str> {
        self.public_signals.get(SIGNAL_TOPIC).map(String::as_str)
    }

    /// Structural validation against an expected scope.
    ///
    /// Checks signal count, hex parseability of both digests, a non-empty
    /// blob, and that the embedded topic equals the scope the caller is
    /// authorizing. Does not judge cryptographic validity; backends do.
    pub fn has_valid_shape(&self, expected_scope: &ActionScope) -> bool {
        self.public_signals.len() == SIGNAL_COUNT
            && self.commitment().is_some()
            && self.nullifier_hash().is_some()
            && self.topic() == Some(expected_scope.topic.as_str())
            && !self.proof_blob.is_empty()
    }
}

mod hex_blob {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.len() % 2 != 0 {
            return Err(serde::de::Error::custom("odd-length hex blob"));
        }
        // Reject non-hex (including multibyte UTF-8 and signs) before
        // decoding, so pairing over bytes never splits a character.
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(serde::de::Error::custom("non-hex character in blob"));
        }
        s.as_bytes()
            .chunks(2)
            .map(|pair| {
                let digits = std::str::from_utf8(pair)
                    .map_err(|e| serde::de::Error::custom(format!("invalid hex blob: {e}")))?;
                u8::from_str_radix(digits, 16)
                    .map_err(|e| serde::de::Error::custom(format!("invalid hex blob: {e}")))
            })
            .collect()
    }
}
