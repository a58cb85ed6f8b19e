//! # HTTP Route Modules
//!
//! Thin handlers only: extract, validate, call the service, map the
//! result. No business logic lives here.

pub mod alerts;
pub mod artifacts;
pub mod authz;
pub mod identities;

use serde::Deserialize;
use utoipa::ToSchema;

use veil_proof::Proof;

/// Wire form of an authorization proof.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProofDto {
    /// Ordered public signals: commitment hex, nullifier hex, topic.
    pub public_signals: Vec<String>,
    /// Backend-specific evidence bytes, lowercase hex.
    pub proof_blob: String,
}

impl ProofDto {
    /// Convert to the protocol proof type, decoding the blob hex.
    pub fn into_proof(self) -> Result<Proof, String> {
        if self.proof_blob.is_empty() || self.proof_blob.len() % 2 != 0 {
            return Err("proof_blob must be non-empty even-length hex".to_string());
        }
        // Validate before decoding: pairing over bytes must never land
        // inside a multibyte character, and signs are not hex.
        if !self.proof_blob.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err("proof_blob must be hex".to_string());
        }
        let mut blob = Vec::with_capacity(self.proof_blob.len() / 2);
        for pair in self.proof_blob.as_bytes().chunks(2) {
            let digits =
                std::str::from_utf8(pair).map_err(|_| "proof_blob must be hex".to_string())?;
            let byte = u8::from_str_radix(digits, 16)
                .map_err(|_| "proof_blob must be hex".to_string())?;
            blob.push(byte);
        }
        Ok(Proof {
            public_signals: self.public_signals,
            proof_blob: blob,
        })
    }

    /// Build the DTO from a protocol proof. Test and client helper.
    pub fn from_proof(proof: &Proof) -> Self {
        Self {
            public_signals: proof.public_signals.clone(),
            proof_blob: proof
                .proof_blob
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect(),
        }
    }
}
