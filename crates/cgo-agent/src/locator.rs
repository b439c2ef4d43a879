//! Agent Locator
//!
//! Resolves an identity to an [`AgentHandle`]. Resolution is deterministic,
//! idempotent and never fails on its own.

use crate::directory::{AgentDirectory, AgentStub, LocationHint};
use crate::error::AgentError;
use crate::state::SessionState;
use cgo_identity::AgentIdentity;
use std::sync::Arc;

/// How far to look for an existing agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JurisdictionMode {
    /// Only the default jurisdiction
    #[default]
    Local,
    /// Every jurisdiction
    ///
    /// No multi-region directory exists yet, so this resolves exactly like
    /// [`JurisdictionMode::Local`].
    SearchAll,
}

impl From<bool> for JurisdictionMode {
    fn from(cross_jurisdiction: bool) -> Self {
        if cross_jurisdiction {
            Self::SearchAll
        } else {
            Self::Local
        }
    }
}

/// Handle to one logical agent
#[derive(Debug, Clone)]
pub struct AgentHandle {
    identity: AgentIdentity,
    stub: Arc<dyn AgentStub>,
}

impl AgentHandle {
    /// Wrap a stub
    #[must_use]
    pub fn new(stub: Arc<dyn AgentStub>) -> Self {
        Self {
            identity: stub.identity().clone(),
            stub,
        }
    }

    /// Identity this handle addresses
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    /// Whether the owning component has written state yet
    pub async fn is_initialized(&self) -> Result<bool, AgentError> {
        self.stub.is_initialized().await
    }

    /// Full state snapshot straight from the stub
    pub async fn get_full_state(&self) -> Result<SessionState, AgentError> {
        self.stub.get_full_state().await
    }

    /// Replace the full state
    pub async fn set_state(&self, state: SessionState) -> Result<(), AgentError> {
        self.stub.set_state(state).await
    }
}

impl PartialEq for AgentHandle {
    /// Handles are equal when they address the same agent
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for AgentHandle {}

/// Resolves identities against an [`AgentDirectory`]
#[derive(Debug, Clone)]
pub struct AgentLocator {
    directory: Arc<dyn AgentDirectory>,
    location_hint: LocationHint,
}

impl AgentLocator {
    /// Create locator using the default placement hint
    #[inline]
    #[must_use]
    pub fn new(directory: Arc<dyn AgentDirectory>) -> Self {
        Self {
            directory,
            location_hint: LocationHint::default(),
        }
    }

    /// With placement hint for newly created agents
    #[inline]
    #[must_use]
    pub fn with_location_hint(mut self, hint: LocationHint) -> Self {
        self.location_hint = hint;
        self
    }

    /// Placement hint in use
    #[inline]
    #[must_use]
    pub fn location_hint(&self) -> &LocationHint {
        &self.location_hint
    }

    /// Resolve `identity` to its handle, creating the agent lazily
    pub fn resolve(&self, identity: &AgentIdentity, mode: JurisdictionMode) -> AgentHandle {
        match mode {
            JurisdictionMode::Local => {}
            JurisdictionMode::SearchAll => {
                // Single-region directory: nothing else to search.
                tracing::debug!(agent_id = %identity, "cross-jurisdiction search unavailable, using default jurisdiction");
            }
        }

        let stub = self
            .directory
            .resolve_or_create(identity, &self.location_hint);
        tracing::info!(agent_id = %identity, "Agent {} retrieved directly", identity);
        AgentHandle::new(stub)
    }
}
