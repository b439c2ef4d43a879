//! Agent Cloner
//!
//! Duplicates an initialized agent under a freshly minted identity.
//!
//! # Workflow
//! 1. Resolve the source (searching all jurisdictions) and check it is initialized
//! 2. Mint a new identity
//! 3. Resolve the target for the new identity
//! 4. Read the full source state
//! 5. Build the clone with runtime fields reset
//! 6. Write the clone in one `set_state`
//!
//! The new identity is not returned to anyone until step 6 completes, so no
//! caller can observe a half-written clone. The source is only ever read.

use crate::accessor::fetch_state;
use crate::error::AgentError;
use crate::locator::{AgentHandle, AgentLocator, JurisdictionMode};
use cgo_identity::{AgentIdentity, IdGenerator};
use std::sync::Arc;

/// Result of a successful clone
#[derive(Debug, Clone)]
pub struct ClonedAgent {
    /// Identity minted for the clone
    pub identity: AgentIdentity,
    /// Handle to the clone
    pub handle: AgentHandle,
}

/// Clones agents through a locator
#[derive(Debug, Clone)]
pub struct AgentCloner {
    locator: AgentLocator,
    ids: Arc<dyn IdGenerator>,
}

impl AgentCloner {
    /// Create cloner
    #[inline]
    #[must_use]
    pub fn new(locator: AgentLocator, ids: Arc<dyn IdGenerator>) -> Self {
        Self { locator, ids }
    }

    /// Clone `source` under a new identity
    ///
    /// # Errors
    /// - `AgentError::NotFound` if the source was never initialized
    /// - `AgentError::Orchestration` if either actor cannot be reached
    pub async fn clone_agent(&self, source: &AgentIdentity) -> Result<ClonedAgent, AgentError> {
        let source_handle = self.locator.resolve(source, JurisdictionMode::SearchAll);

        let initialized = source_handle.is_initialized().await.map_err(|e| {
            tracing::error!(agent_id = %source, error = %e, "clone source unreachable");
            e
        })?;
        if !initialized {
            tracing::error!(agent_id = %source, "clone source not found");
            return Err(AgentError::NotFound(source.clone()));
        }

        let identity = AgentIdentity::generate(self.ids.as_ref());
        let handle = self.locator.resolve(&identity, JurisdictionMode::Local);

        let original = fetch_state(&source_handle).await?;
        let cloned = original.clone_for(identity.clone());

        handle.set_state(cloned).await.map_err(|e| {
            tracing::error!(agent_id = %source, new_agent_id = %identity, error = %e, "failed to write clone");
            e
        })?;

        tracing::info!(agent_id = %source, new_agent_id = %identity, "agent cloned");
        Ok(ClonedAgent { identity, handle })
    }
}
