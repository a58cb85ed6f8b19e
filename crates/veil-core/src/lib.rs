//! # veil-core — Foundational Types for the Veil Stack
//!
//! This crate is the bedrock of the Veil Stack. It defines the type-system
//! primitives shared by every other crate in the workspace; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Commitment`,
//!    `NullifierHash`, `ReferenceId`, `ScopeGroup`, `TopicId` — all newtypes
//!    with validated constructors. No bare strings for identifiers, so a
//!    nullifier hash can never be passed where a commitment is expected.
//!
//! 2. **Closed scope space.** `ActionKind` is an exhaustive enum, not a
//!    free-form string. Adding an action kind forces every consumer to
//!    handle it.
//!
//! 3. **Hex-on-the-wire digests.** `Digest` is 32 raw bytes in memory and a
//!    64-char lowercase hex string in every serialized form.
//!
//! 4. **UTC-only timestamps.** `Timestamp` enforces UTC with Z suffix and
//!    seconds precision; non-UTC inputs are rejected at construction.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `veil-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod scope;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use digest::{sha256, Digest};
pub use error::CoreError;
pub use identity::{Commitment, NullifierHash, OperatorId, ReferenceId};
pub use scope::{ActionKind, ActionScope, ScopeGroup, TopicId, DEFAULT_SCOPE_GROUP};
pub use temporal::Timestamp;
