//! Error types for agent addressing and state access

use cgo_identity::AgentIdentity;

/// Agent-side failures
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agent has never been initialized by its owning component
    #[error("agent not found: {0}")]
    NotFound(AgentIdentity),

    /// Unexpected collaborator failure, wrapped with operation context
    #[error("{operation} failed for agent {agent_id}: {message}")]
    Orchestration {
        /// Operation being performed (`get_full_state`, `set_state`, ...)
        operation: &'static str,
        /// Agent the operation targeted
        agent_id: AgentIdentity,
        /// Underlying failure
        message: String,
    },
}

impl AgentError {
    /// Create orchestration error for an agent operation
    pub fn orchestration(
        operation: &'static str,
        agent_id: &AgentIdentity,
        message: impl Into<String>,
    ) -> Self {
        Self::Orchestration {
            operation,
            agent_id: agent_id.clone(),
            message: message.into(),
        }
    }

    /// Check if this is a missing/uninitialized agent
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Agent this error concerns
    #[must_use]
    pub fn agent_id(&self) -> &AgentIdentity {
        match self {
            Self::NotFound(id) | Self::Orchestration { agent_id: id, .. } => id,
        }
    }
}

/// Content insert rejected because the key names a typed session field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is a typed session field and cannot be stored as content")]
pub struct ReservedKeyError(pub String);
