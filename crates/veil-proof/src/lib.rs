//! # veil-proof — Anonymous Identities and the Proof Protocol
//!
//! The cryptographic layer of the Veil Stack: secret-holding anonymous
//! identities, deterministic scope-bound nullifier derivation, and the
//! pluggable `ProofBackend` interface that the authorization service
//! verifies against.
//!
//! ## Key Design Principles
//!
//! 1. **Secrets never serialize.** `Secret` implements neither
//!    `Serialize` nor `Display`; its `Debug` output is redacted. The only
//!    values that leave this crate in serialized form are one-way hashes.
//! 2. **Domain separation everywhere.** Commitments, nullifiers, and
//!    proof blobs each hash under a distinct domain tag, so a value from
//!    one derivation can never collide with or be replayed as another.
//! 3. **Fail closed.** Verification answers `false` for anything it
//!    cannot positively validate — malformed signals, unparseable hex,
//!    scope mismatch, or a blob of the wrong length.
//!
//! ## Crate Policy
//!
//! Depends only on `veil-core` internally. No `unsafe`. No `unwrap()`
//! outside tests.

pub mod backend;
pub mod hash_backend;
pub mod hashing;
pub mod identity;
pub mod nullifier;
pub mod proof;

pub use backend::{ProofBackend, ProofError};
pub use hash_backend::HashProofBackend;
pub use identity::{derive_commitment, Identity, Secret};
pub use nullifier::derive_nullifier;
pub use proof::Proof;
