//! In-process actor directory
//!
//! Each initialized identity gets one spawned task that owns its state and
//! drains a bounded mailbox, so every operation on one agent runs in
//! arrival order while distinct agents proceed independently.
//!
//! Resolving is free: a stub only addresses its identity. The actor task is
//! spawned by the first write, so reads of never-written identities leave
//! nothing behind and resolving works without a runtime.

use crate::directory::{AgentDirectory, AgentStub, LocationHint};
use crate::error::AgentError;
use crate::state::SessionState;
use async_trait::async_trait;
use cgo_identity::AgentIdentity;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Default mailbox depth per actor
pub const DEFAULT_MAILBOX_CAPACITY: usize = 64;

/// Messages sent to an actor
#[derive(Debug)]
enum ActorCommand {
    /// Return a copy of the state
    GetState(oneshot::Sender<SessionState>),
    /// Replace the state
    SetState(Box<SessionState>, oneshot::Sender<()>),
}

/// Mailbox of a running actor
#[derive(Debug, Clone)]
struct ActorRef {
    location: LocationHint,
    sender: mpsc::Sender<ActorCommand>,
}

type ActorMap = DashMap<AgentIdentity, ActorRef>;

/// Stub addressing one identity in an [`InMemoryDirectory`]
#[derive(Debug)]
pub struct ActorStub {
    identity: AgentIdentity,
    location: LocationHint,
    actors: Arc<ActorMap>,
    mailbox_capacity: usize,
}

impl ActorStub {
    /// Placement hint applied if this stub's write creates the actor
    #[inline]
    #[must_use]
    pub fn location(&self) -> &LocationHint {
        &self.location
    }

    fn actor(&self) -> Option<ActorRef> {
        self.actors.get(&self.identity).map(|actor| actor.clone())
    }

    async fn request<T>(
        &self,
        actor: &ActorRef,
        operation: &'static str,
        make: impl FnOnce(oneshot::Sender<T>) -> ActorCommand,
    ) -> Result<T, AgentError> {
        let (tx, rx) = oneshot::channel();
        actor
            .sender
            .send(make(tx))
            .await
            .map_err(|_| AgentError::orchestration(operation, &self.identity, "mailbox closed"))?;
        rx.await
            .map_err(|_| AgentError::orchestration(operation, &self.identity, "actor dropped reply"))
    }

    fn spawn_actor(&self, state: SessionState) -> ActorRef {
        let (tx, rx) = mpsc::channel(self.mailbox_capacity);
        tokio::spawn(actor_task(self.identity.clone(), state, rx));
        tracing::debug!(agent_id = %self.identity, location = %self.location, "spawned agent actor");

        ActorRef {
            location: self.location.clone(),
            sender: tx,
        }
    }
}

#[async_trait]
impl AgentStub for ActorStub {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    async fn is_initialized(&self) -> Result<bool, AgentError> {
        Ok(self.actors.contains_key(&self.identity))
    }

    async fn get_full_state(&self) -> Result<SessionState, AgentError> {
        let Some(actor) = self.actor() else {
            return Err(AgentError::NotFound(self.identity.clone()));
        };
        self.request(&actor, "get_full_state", ActorCommand::GetState)
            .await
    }

    async fn set_state(&self, state: SessionState) -> Result<(), AgentError> {
        let actor = match self.actors.entry(self.identity.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                entry.insert(self.spawn_actor(state));
                return Ok(());
            }
        };
        self.request(&actor, "set_state", |tx| ActorCommand::SetState(Box::new(state), tx))
            .await
    }
}

/// Directory of in-process actors keyed by identity
#[derive(Debug)]
pub struct InMemoryDirectory {
    actors: Arc<ActorMap>,
    mailbox_capacity: usize,
}

impl InMemoryDirectory {
    /// Create empty directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_mailbox_capacity(DEFAULT_MAILBOX_CAPACITY)
    }

    /// Create directory with a custom per-actor mailbox depth
    #[must_use]
    pub fn with_mailbox_capacity(capacity: usize) -> Self {
        Self {
            actors: Arc::new(DashMap::new()),
            mailbox_capacity: capacity.max(1),
        }
    }

    /// Number of initialized agents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Check if no agent was ever written
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Check if `identity` has been written
    #[inline]
    #[must_use]
    pub fn contains(&self, identity: &AgentIdentity) -> bool {
        self.actors.contains_key(identity)
    }

    /// Placement the actor for `identity` was created with
    #[must_use]
    pub fn location_of(&self, identity: &AgentIdentity) -> Option<LocationHint> {
        self.actors.get(identity).map(|actor| actor.location.clone())
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentDirectory for InMemoryDirectory {
    fn resolve_or_create(
        &self,
        identity: &AgentIdentity,
        hint: &LocationHint,
    ) -> Arc<dyn AgentStub> {
        Arc::new(ActorStub {
            identity: identity.clone(),
            location: hint.clone(),
            actors: Arc::clone(&self.actors),
            mailbox_capacity: self.mailbox_capacity,
        })
    }
}

/// Actor loop (runs in its own tokio task)
async fn actor_task(
    identity: AgentIdentity,
    mut state: SessionState,
    mut rx: mpsc::Receiver<ActorCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            ActorCommand::GetState(reply) => {
                let _ = reply.send(state.clone());
            }
            ActorCommand::SetState(next, reply) => {
                state = *next;
                let _ = reply.send(());
            }
        }
    }

    tracing::debug!(agent_id = %identity, "agent actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let directory = InMemoryDirectory::new();
        let id = AgentIdentity::new("a1");

        let first = directory.resolve_or_create(&id, &LocationHint::default());
        let second = directory.resolve_or_create(&id, &LocationHint::default());
        assert_eq!(first.identity(), second.identity());
        assert!(directory.is_empty());

        first.set_state(SessionState::new(id.clone())).await.unwrap();
        assert!(second.is_initialized().await.unwrap());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn resolve_outside_runtime() {
        let directory = InMemoryDirectory::new();
        let stub = directory.resolve_or_create(&AgentIdentity::new("sync"), &LocationHint::default());
        assert_eq!(stub.identity().as_str(), "sync");
        assert!(directory.is_empty());
    }

    #[tokio::test]
    async fn unknown_reads_leave_no_trace() {
        let directory = InMemoryDirectory::new();

        for n in 0..1000 {
            let stub = directory
                .resolve_or_create(&AgentIdentity::new(format!("unknown-{n}")), &LocationHint::default());
            assert!(!stub.is_initialized().await.unwrap());
            assert!(stub.get_full_state().await.unwrap_err().is_not_found());
        }

        assert!(directory.is_empty());
    }

    #[tokio::test]
    async fn distinct_identities_do_not_alias() {
        let directory = InMemoryDirectory::new();
        let a = directory.resolve_or_create(&AgentIdentity::new("a"), &LocationHint::default());
        let b = directory.resolve_or_create(&AgentIdentity::new("b"), &LocationHint::default());

        a.set_state(SessionState::new(AgentIdentity::new("a"))).await.unwrap();

        assert!(a.is_initialized().await.unwrap());
        assert!(!b.is_initialized().await.unwrap());
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn writes_are_applied_in_order() {
        let directory = InMemoryDirectory::with_mailbox_capacity(4);
        let id = AgentIdentity::new("ordered");
        let stub = directory.resolve_or_create(&id, &LocationHint::default());

        for step in 0..20 {
            let state = SessionState::new(id.clone()).with_content("step", json!(step));
            stub.set_state(state).await.unwrap();
        }

        let state = stub.get_full_state().await.unwrap();
        assert_eq!(state.content()["step"], json!(19));
    }

    #[tokio::test]
    async fn concurrent_first_writes_share_one_actor() {
        let directory = InMemoryDirectory::new();
        let id = AgentIdentity::new("raced");
        let stubs: Vec<_> = (0..8)
            .map(|_| directory.resolve_or_create(&id, &LocationHint::default()))
            .collect();

        let writes = stubs.iter().enumerate().map(|(n, stub)| {
            stub.set_state(SessionState::new(id.clone()).with_content("writer", json!(n)))
        });
        for result in futures::future::join_all(writes).await {
            result.unwrap();
        }

        assert_eq!(directory.len(), 1);
        let state = stubs[0].get_full_state().await.unwrap();
        assert!(state.content()["writer"].as_u64().unwrap() < 8);
    }

    #[tokio::test]
    async fn creating_write_sets_location() {
        let directory = InMemoryDirectory::new();
        let id = AgentIdentity::new("placed");
        let west = directory.resolve_or_create(&id, &LocationHint::new("weur"));
        let east = directory.resolve_or_create(&id, &LocationHint::new("apac"));

        east.set_state(SessionState::new(id.clone())).await.unwrap();
        west.set_state(SessionState::new(id.clone())).await.unwrap();

        assert_eq!(directory.location_of(&id), Some(LocationHint::new("apac")));
    }
}
