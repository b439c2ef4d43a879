//! Actor directory contracts
//!
//! The directory maps an [`AgentIdentity`] to exactly one logical,
//! single-owner actor. Implementations must serialize all operations against
//! one identity and must never alias two identities to the same actor.

use crate::error::AgentError;
use crate::state::SessionState;
use async_trait::async_trait;
use cgo_identity::AgentIdentity;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Placement hint passed to the directory when an actor is first created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationHint(String);

impl LocationHint {
    /// Create hint
    #[inline]
    #[must_use]
    pub fn new(hint: impl Into<String>) -> Self {
        Self(hint.into())
    }

    /// Borrow the raw hint
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LocationHint {
    /// Eastern North America
    fn default() -> Self {
        Self::new("enam")
    }
}

impl fmt::Display for LocationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote view of one actor
///
/// Owned and implemented by the generation component's runtime.
#[async_trait]
pub trait AgentStub: Send + Sync + Debug {
    /// Identity this stub addresses
    fn identity(&self) -> &AgentIdentity;

    /// Whether the owning component has written state yet
    async fn is_initialized(&self) -> Result<bool, AgentError>;

    /// Full state snapshot
    ///
    /// # Errors
    /// `AgentError::NotFound` if never initialized.
    async fn get_full_state(&self) -> Result<SessionState, AgentError>;

    /// Replace the full state in one atomic write
    async fn set_state(&self, state: SessionState) -> Result<(), AgentError>;
}

/// Key-addressed directory of actors
pub trait AgentDirectory: Send + Sync + Debug {
    /// Stub for `identity`, creating the actor lazily
    ///
    /// Never fails and needs no async runtime; backing state may not exist
    /// until the first write.
    fn resolve_or_create(&self, identity: &AgentIdentity, hint: &LocationHint)
        -> Arc<dyn AgentStub>;
}
