//! # veil-ledger — Commitment Registry and Nullifier Ledger
//!
//! The two storage seams of the authorization protocol: the registry of
//! disclosed identity commitments, and the append-only ledger of claimed
//! nullifiers that enforces "at most once" per action scope.
//!
//! ## Key Design Principles
//!
//! 1. **Traits at the seam.** Services hold `Arc<dyn CommitmentRegistry>`
//!    and `Arc<dyn NullifierLedger>`; the in-memory implementations here
//!    and the Postgres implementations in `veil-api` are interchangeable.
//! 2. **Claim is the atom.** `NullifierLedger::claim` is a single
//!    compare-and-insert. Callers never check-then-claim; racing claims
//!    for the same nullifier and scope resolve to exactly one `Claimed`.
//! 3. **Nothing here links back.** The ledger stores nullifier hashes and
//!    scopes only. No commitment, no payload, no ordering hint that could
//!    correlate entries to an identity.
//!
//! ## Crate Policy
//!
//! Depends only on `veil-core` internally. No `unsafe`. No `unwrap()`
//! outside tests.

pub mod error;
pub mod memory;
pub mod nullifiers;
pub mod registry;

pub use error::{LedgerError, RegistryError};
pub use memory::{MemoryCommitmentRegistry, MemoryNullifierLedger};
pub use nullifiers::{ClaimOutcome, NullifierLedger};
pub use registry::{CommitmentRegistry, IdentityRecord, Registration};
