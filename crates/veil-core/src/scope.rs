//! # Action Scopes
//!
//! The scope model of the authorization protocol: `ActionKind` (a closed
//! enum of designated actions), `TopicId` (an opaque target identifier),
//! and `ActionScope` (the pair that bounds "at most once" enforcement).
//!
//! ## Security Invariant
//!
//! The pair `(action_kind, topic)` fully determines the admissible
//! nullifier space for one identity. `ActionKind` is deliberately a closed
//! enum rather than a free-form string so the scope space is exhaustively
//! checkable at compile time; `TopicId` stays opaque so the scheme
//! generalizes across artifact kinds.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::identity::ReferenceId;

/// The scope group used when none is configured.
pub const DEFAULT_SCOPE_GROUP: &str = "reports-v1";

/// Maximum accepted topic length, matching the database column width.
const MAX_TOPIC_LEN: usize = 255;

// ─── ActionKind ──────────────────────────────────────────────────────

/// The designated actions a registered identity may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Submit a new report into the scope group.
    Submit,
    /// Cast a support vote on an existing artifact.
    Upvote,
    /// Raise an emergency alert into the scope group.
    EmergencyAlert,
}

impl ActionKind {
    /// Return the string representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Upvote => "upvote",
            Self::EmergencyAlert => "emergency_alert",
        }
    }

    /// Single-byte tag used in domain-separated hashing.
    ///
    /// Stable across versions — changing a tag would silently change every
    /// derived nullifier for that kind.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Submit => 1,
            Self::Upvote => 2,
            Self::EmergencyAlert => 3,
        }
    }

    /// Parse an action kind from its string representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "submit" => Ok(Self::Submit),
            "upvote" => Ok(Self::Upvote),
            "emergency_alert" => Ok(Self::EmergencyAlert),
            other => Err(CoreError::UnknownActionKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── ScopeGroup ──────────────────────────────────────────────────────

/// A named namespace partitioning identities.
///
/// Unlinkability guarantees and nullifier derivation are namespace-scoped;
/// identities from different groups are not comparable. Once a commitment
/// is registered it is permanently associated with its group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeGroup(String);

impl ScopeGroup {
    /// Create a scope group from a validated name.
    ///
    /// Names are lowercase alphanumeric plus `-`/`_`, 1..=64 chars.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() || name.len() > 64 {
            return Err(CoreError::InvalidScopeGroup(format!(
                "group name must be 1..=64 chars, got {}",
                name.len()
            )));
        }
        if !name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
        {
            return Err(CoreError::InvalidScopeGroup(format!(
                "group name must be lowercase alphanumeric with - or _, got {name:?}"
            )));
        }
        Ok(Self(name))
    }

    /// The group name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ScopeGroup {
    fn default() -> Self {
        // DEFAULT_SCOPE_GROUP is a valid name by construction.
        Self(DEFAULT_SCOPE_GROUP.to_string())
    }
}

impl std::fmt::Display for ScopeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── TopicId ─────────────────────────────────────────────────────────

/// The opaque target identifier of an action scope.
///
/// Typically the reference id of the artifact being acted on, or the
/// group-wide sentinel for actions that target no particular artifact
/// (submission itself, emergency alerts).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicId(String);

impl TopicId {
    /// Create a topic from caller input.
    pub fn new(topic: impl Into<String>) -> Result<Self, CoreError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(CoreError::InvalidTopic("topic must not be empty".to_string()));
        }
        if topic.len() > MAX_TOPIC_LEN {
            return Err(CoreError::InvalidTopic(format!(
                "topic must not exceed {MAX_TOPIC_LEN} chars, got {}",
                topic.len()
            )));
        }
        Ok(Self(topic))
    }

    /// The topic addressing a specific artifact.
    pub fn for_artifact(reference_id: &ReferenceId) -> Self {
        Self(format!("artifact:{reference_id}"))
    }

    /// The fixed sentinel topic for group-wide actions.
    pub fn group_wide(group: &ScopeGroup) -> Self {
        Self(format!("group:{group}"))
    }

    /// The topic as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── ActionScope ─────────────────────────────────────────────────────

/// The boundary within which "at most once" is enforced for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionScope {
    /// Which designated action this scope covers.
    pub action_kind: ActionKind,
    /// The target of the action.
    pub topic: TopicId,
}

impl ActionScope {
    /// Create a scope from a kind and topic.
    pub fn new(action_kind: ActionKind, topic: TopicId) -> Self {
        Self { action_kind, topic }
    }
}

impl std::fmt::Display for ActionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.action_kind, self.topic)
    }
}
