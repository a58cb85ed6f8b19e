//! # External Collaborator Seams
//!
//! The three services the submission pipeline consumes but does not own:
//! payload encryption, content-addressed ciphertext storage, and the
//! tamper-evidence anchor log. Each is a trait with an in-process
//! reference implementation; real deployments substitute their own.
//!
//! ## Security Invariant
//!
//! Nothing behind these seams ever receives an identity commitment or a
//! nullifier. They see ciphertext bytes and digests only, so a
//! compromised collaborator cannot correlate payloads to identities.

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use veil_core::{sha256, Digest};

use crate::error::CollaboratorError;

// ─── Encryption ──────────────────────────────────────────────────────

/// Ciphertext plus the key material needed to decrypt it.
///
/// The pipeline stores the ciphertext reference and discards the key
/// material; custody of keys is the collaborator deployment's problem.
#[derive(Debug, Clone)]
pub struct EncryptedPayload {
    /// The encrypted payload bytes.
    pub ciphertext: Vec<u8>,
    /// Key material for decryption. Never persisted by this crate.
    pub key_material: Vec<u8>,
}

/// Payload encryption seam.
#[async_trait]
pub trait EncryptionService: Send + Sync {
    /// Encrypt a plaintext payload under a fresh key.
    async fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedPayload, CollaboratorError>;
}

/// In-process encryption: a SHA-256 counter keystream XORed over the
/// plaintext under a fresh random 32-byte key.
///
/// Unauthenticated and deliberately simple. Deployments substitute an
/// AEAD-backed service here.
#[derive(Debug, Default)]
pub struct KeystreamEncryption;

impl KeystreamEncryption {
    fn keystream_block(key: &[u8; 32], counter: u64) -> Digest {
        let mut input = Vec::with_capacity(40);
        input.extend_from_slice(key);
        input.extend_from_slice(&counter.to_be_bytes());
        sha256(&input)
    }
}

#[async_trait]
impl EncryptionService for KeystreamEncryption {
    async fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedPayload, CollaboratorError> {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);

        let mut ciphertext = Vec::with_capacity(plaintext.len());
        for (counter, chunk) in plaintext.chunks(32).enumerate() {
            let block = Self::keystream_block(&key, counter as u64);
            for (byte, pad) in chunk.iter().zip(block.as_bytes()) {
                ciphertext.push(byte ^ pad);
            }
        }

        Ok(EncryptedPayload {
            ciphertext,
            key_material: key.to_vec(),
        })
    }
}

// ─── Content store ───────────────────────────────────────────────────

/// Identifier of a stored ciphertext, content-addressed by its digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub Digest);

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "content:{}", self.0)
    }
}

/// Content-addressed ciphertext storage seam.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store bytes, returning their content id. Idempotent: identical
    /// bytes yield the same id.
    async fn put(&self, bytes: &[u8]) -> Result<ContentId, CollaboratorError>;

    /// Fetch stored bytes by id.
    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, CollaboratorError>;
}

/// In-process content store: a digest-keyed map.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: RwLock<HashMap<Digest, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(&self, bytes: &[u8]) -> Result<ContentId, CollaboratorError> {
        let digest = sha256(bytes);
        self.blobs.write().entry(digest).or_insert_with(|| bytes.to_vec());
        Ok(ContentId(digest))
    }

    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, CollaboratorError> {
        Ok(self.blobs.read().get(&id.0).cloned())
    }
}

// ─── Anchor log ──────────────────────────────────────────────────────

/// Position of a digest in the anchor log: its sequence number and the
/// chained root covering every entry up to and including it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorPointer {
    /// Zero-based append position.
    pub seq: u64,
    /// Chained root after this append.
    pub root: Digest,
}

/// Tamper-evidence anchor seam. Append-only.
#[async_trait]
pub trait AnchorLog: Send + Sync {
    /// Append a payload digest, returning its pointer.
    async fn append(&self, digest: Digest) -> Result<AnchorPointer, CollaboratorError>;

    /// The current root, if anything has been anchored.
    async fn current_root(&self) -> Result<Option<Digest>, CollaboratorError>;
}

/// In-process anchor log: a hash chain.
///
/// `root_n = SHA256(root_{n-1} ‖ leaf_n)`, with the first root hashing a
/// zero digest. Changing any anchored digest changes every later root.
#[derive(Debug, Default)]
pub struct ChainedAnchorLog {
    state: RwLock<ChainState>,
}

#[derive(Debug, Default)]
struct ChainState {
    len: u64,
    root: Option<Digest>,
}

impl ChainedAnchorLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnchorLog for ChainedAnchorLog {
    async fn append(&self, digest: Digest) -> Result<AnchorPointer, CollaboratorError> {
        let mut state = self.state.write();
        let prev = state.root.unwrap_or(Digest::from_bytes([0u8; 32]));
        let mut input = Vec::with_capacity(64);
        input.extend_from_slice(prev.as_bytes());
        input.extend_from_slice(digest.as_bytes());
        let root = sha256(&input);

        let seq = state.len;
        state.len += 1;
        state.root = Some(root);
        Ok(AnchorPointer { seq, root })
    }

    async fn current_root(&self) -> Result<Option<Digest>, CollaboratorError> {
        Ok(self.state.read().root)
    }
}
