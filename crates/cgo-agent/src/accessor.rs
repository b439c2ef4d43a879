//! State Accessor

use crate::error::AgentError;
use crate::locator::AgentHandle;
use crate::state::SessionState;

/// Read the full persisted state of a resolved agent
///
/// Read-only; the agent is never touched beyond the two queries.
///
/// # Errors
/// - `AgentError::NotFound` if the agent was never initialized
/// - `AgentError::Orchestration` if the actor cannot be reached
pub async fn fetch_state(handle: &AgentHandle) -> Result<SessionState, AgentError> {
    let initialized = handle.is_initialized().await.map_err(|e| {
        tracing::error!(agent_id = %handle.identity(), error = %e, "failed to query agent");
        e
    })?;

    if !initialized {
        tracing::error!(agent_id = %handle.identity(), "agent state requested before initialization");
        return Err(AgentError::NotFound(handle.identity().clone()));
    }

    handle.get_full_state().await.map_err(|e| {
        tracing::error!(agent_id = %handle.identity(), error = %e, "failed to read agent state");
        e
    })
}
