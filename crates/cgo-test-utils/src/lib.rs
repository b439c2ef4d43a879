//! Testing utilities for CGO workspace
//!
//! In-memory collaborators, deterministic id generation and fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use cgo_agent::{AgentHandle, ClientReportedError, DevState, GenerationMarker, SessionState};
use cgo_core::{CgoConfig, Orchestrator};
use cgo_identity::{AgentIdentity, IdGenerator};
use cgo_template::{
    BlobStore, BlobStoreError, InferenceContext, InferenceMatcher, MatcherError,
    TemplateCatalogEntry, TemplateSelection, CATALOG_KEY,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Blob store backed by a map
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `entries` under the default catalog key
    pub fn with_catalog(entries: &[TemplateCatalogEntry]) -> Self {
        let store = Self::new();
        store.put_catalog(entries);
        store
    }

    pub fn put(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.blobs.write().insert(key.into(), bytes.into());
    }

    pub fn put_catalog(&self, entries: &[TemplateCatalogEntry]) {
        let bytes = serde_json::to_vec(entries).unwrap();
        self.put(CATALOG_KEY, bytes);
    }

    pub fn remove(&self, key: &str) {
        self.blobs.write().remove(key);
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        Ok(self.blobs.read().get(key).cloned())
    }
}

/// Blob store that always fails
#[derive(Debug, Default)]
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        Err(BlobStoreError::Backend("storage offline".to_string()))
    }
}

/// Blob store that answers after a delay
#[derive(Debug)]
pub struct SlowBlobStore {
    inner: InMemoryBlobStore,
    delay: Duration,
}

impl SlowBlobStore {
    pub fn new(inner: InMemoryBlobStore, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl BlobStore for SlowBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }
}

/// Matcher returning a fixed selection and recording every call
#[derive(Debug)]
pub struct StubMatcher {
    selection: TemplateSelection,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// One matcher invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub context: InferenceContext,
    pub query: String,
    pub catalog: Vec<TemplateCatalogEntry>,
}

impl StubMatcher {
    pub fn selecting(name: &str) -> Self {
        Self::returning(TemplateSelection::named(name))
    }

    pub fn selecting_nothing() -> Self {
        Self::returning(TemplateSelection::none())
    }

    pub fn returning(selection: TemplateSelection) -> Self {
        Self {
            selection,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer only after `delay`
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl InferenceMatcher for StubMatcher {
    async fn select_template(
        &self,
        context: &InferenceContext,
        query: &str,
        catalog: &[TemplateCatalogEntry],
    ) -> Result<TemplateSelection, MatcherError> {
        self.calls.lock().push(RecordedCall {
            context: context.clone(),
            query: query.to_string(),
            catalog: catalog.to_vec(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.selection.clone())
    }
}

/// Matcher that always fails
#[derive(Debug, Default)]
pub struct FailingMatcher;

#[async_trait]
impl InferenceMatcher for FailingMatcher {
    async fn select_template(
        &self,
        _context: &InferenceContext,
        _query: &str,
        _catalog: &[TemplateCatalogEntry],
    ) -> Result<TemplateSelection, MatcherError> {
        Err(MatcherError::Inference("model unavailable".to_string()))
    }
}

/// Generates `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

/// Catalog used across the integration tests
pub fn sample_catalog() -> Vec<TemplateCatalogEntry> {
    vec![
        TemplateCatalogEntry::new("starter-basic")
            .with_description("Minimal HTTP service")
            .with_language("go"),
        TemplateCatalogEntry::new("react-dashboard")
            .with_description("Admin dashboard with charts")
            .with_language("typescript")
            .with_frameworks(["react", "vite"]),
        TemplateCatalogEntry::new("next-saas")
            .with_description("SaaS starter with auth and billing")
            .with_language("typescript")
            .with_frameworks(["nextjs", "tailwind"]),
    ]
}

/// State of an agent mid-generation, with every runtime field populated
pub fn busy_session_state(identity: &AgentIdentity) -> SessionState {
    let mut state = SessionState::new(identity.clone())
        .with_content("projectName", "todo-app".into())
        .with_content("query", "build me a todo app".into())
        .with_content(
            "generatedPhases",
            serde_json::json!([{ "name": "scaffold", "completed": true }]),
        )
        .with_content(
            "blueprint",
            serde_json::json!({ "title": "Todo", "frameworks": ["react"] }),
        );
    state.sandbox_instance_id = Some("sandbox-live-42".to_string());
    state.pending_user_inputs = vec!["add dark mode".to_string()];
    state.current_dev_state = DevState::PhaseImplementing;
    state.generation_promise = Some(GenerationMarker::started("run-7"));
    state.should_be_generating = true;
    state.client_reported_errors = vec![ClientReportedError::new("TypeError: x is undefined")];
    state
}

/// Write `state` to the agent it names, making it initialized
pub async fn seed_agent(orchestrator: &Orchestrator, state: SessionState) -> AgentHandle {
    let handle = orchestrator.resolve_agent(&state.session_id, false);
    handle.set_state(state).await.unwrap();
    handle
}

/// Orchestrator over in-memory collaborators with sequential ids
pub fn setup_test_orchestrator(
    store: Arc<dyn BlobStore>,
    matcher: Arc<dyn InferenceMatcher>,
) -> Orchestrator {
    setup_test_orchestrator_with_config(CgoConfig::default(), store, matcher)
}

pub fn setup_test_orchestrator_with_config(
    config: CgoConfig,
    store: Arc<dyn BlobStore>,
    matcher: Arc<dyn InferenceMatcher>,
) -> Orchestrator {
    Orchestrator::builder(config)
        .catalog_store(store)
        .matcher(matcher)
        .id_generator(Arc::new(SequentialIdGenerator::new("id")))
        .build()
        .unwrap()
}
