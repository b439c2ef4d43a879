//! Code Generation Orchestrator
//!
//! The externally callable surface:
//! - resolve an agent handle by identity
//! - read an agent's full state
//! - clone an agent into a fresh identity
//! - turn a free-text request into a template descriptor
//!
//! Collaborators (agent directory, catalog store, inference matcher, id
//! generator) are injected through [`OrchestratorBuilder`].

use crate::config::{CgoConfig, ConfigError};
use crate::error::CgoError;
use cgo_agent::{
    AgentCloner, AgentDirectory, AgentHandle, AgentLocator, ClonedAgent, InMemoryDirectory,
    JurisdictionMode, SessionState,
};
use cgo_identity::{AgentIdentity, IdGenerator};
use cgo_template::{BlobStore, InferenceContext, InferenceMatcher, TemplateResolution, TemplateSelector};
use std::sync::Arc;

/// The orchestrator
#[derive(Debug, Clone)]
pub struct Orchestrator {
    /// Configuration
    config: CgoConfig,
    /// Agent addressing
    locator: AgentLocator,
    /// Agent cloning
    cloner: AgentCloner,
    /// Template selection pipeline
    selector: TemplateSelector,
}

impl Orchestrator {
    /// Start building an orchestrator
    #[inline]
    #[must_use]
    pub fn builder(config: CgoConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CgoConfig {
        &self.config
    }

    /// Resolve a handle for `identity`
    ///
    /// Never fails and never checks existence. With `cross_jurisdiction`
    /// the lookup may reach agents outside the local jurisdiction.
    #[must_use]
    pub fn resolve_agent(&self, identity: &AgentIdentity, cross_jurisdiction: bool) -> AgentHandle {
        self.locator
            .resolve(identity, JurisdictionMode::from(cross_jurisdiction))
    }

    /// Full state of an initialized agent
    ///
    /// # Errors
    /// - `NotFound` if the agent was never initialized
    /// - `Orchestration` if the agent cannot be reached
    pub async fn fetch_state(&self, handle: &AgentHandle) -> Result<SessionState, CgoError> {
        Ok(cgo_agent::fetch_state(handle).await?)
    }

    /// Clone `source` into a freshly minted identity
    ///
    /// # Errors
    /// - `NotFound` if the source was never initialized
    /// - `Orchestration` if either agent cannot be reached
    pub async fn clone_agent(&self, source: &AgentIdentity) -> Result<ClonedAgent, CgoError> {
        Ok(self.cloner.clone_agent(source).await?)
    }

    /// Resolve a free-text request into a template descriptor
    ///
    /// # Errors
    /// - `CatalogUnavailable` if the catalog cannot be obtained
    /// - `NoSuitableTemplate` if the matcher names nothing
    /// - `SelectionNotFound` if the matcher names an unknown template
    /// - `Orchestration` if the matcher fails or exceeds its budget
    pub async fn select_template_for_query(
        &self,
        query: &str,
        context: &InferenceContext,
    ) -> Result<TemplateResolution, CgoError> {
        Ok(self.selector.select_template_for_query(query, context).await?)
    }
}

/// Builder for [`Orchestrator`]
///
/// The catalog store and the matcher are required. The agent directory
/// defaults to an [`InMemoryDirectory`] and the id generator to the
/// configured token format.
#[derive(Debug)]
pub struct OrchestratorBuilder {
    config: CgoConfig,
    directory: Option<Arc<dyn AgentDirectory>>,
    store: Option<Arc<dyn BlobStore>>,
    matcher: Option<Arc<dyn InferenceMatcher>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl OrchestratorBuilder {
    /// Create builder
    #[inline]
    #[must_use]
    pub fn new(config: CgoConfig) -> Self {
        Self {
            config,
            directory: None,
            store: None,
            matcher: None,
            ids: None,
        }
    }

    /// With agent directory
    #[inline]
    #[must_use]
    pub fn directory(mut self, directory: Arc<dyn AgentDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// With catalog store
    #[inline]
    #[must_use]
    pub fn catalog_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// With inference matcher
    #[inline]
    #[must_use]
    pub fn matcher(mut self, matcher: Arc<dyn InferenceMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// With id generator
    #[inline]
    #[must_use]
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Validate configuration and assemble the orchestrator
    ///
    /// # Errors
    /// `CgoError::Config` if the configuration is invalid or a required
    /// collaborator is missing.
    pub fn build(self) -> Result<Orchestrator, CgoError> {
        self.config.validate()?;

        let store = self
            .store
            .ok_or_else(|| ConfigError::Invalid("catalog store is required".into()))?;
        let matcher = self
            .matcher
            .ok_or_else(|| ConfigError::Invalid("inference matcher is required".into()))?;
        let directory = self.directory.unwrap_or_else(|| {
            Arc::new(InMemoryDirectory::with_mailbox_capacity(
                self.config.agents.mailbox_capacity,
            ))
        });
        let ids = self
            .ids
            .unwrap_or_else(|| self.config.agents.id_format.generator());

        let locator = AgentLocator::new(directory).with_location_hint(self.config.location_hint());
        let cloner = AgentCloner::new(locator.clone(), Arc::clone(&ids));
        let selector =
            TemplateSelector::new(store, matcher, ids).with_config(self.config.selector_config());

        tracing::debug!(
            location_hint = %locator.location_hint(),
            catalog_key = %selector.config().catalog_key,
            "orchestrator assembled"
        );

        Ok(Orchestrator {
            config: self.config,
            locator,
            cloner,
            selector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use cgo_template::{FsBlobStore, KeywordMatcher};

    fn builder() -> OrchestratorBuilder {
        Orchestrator::builder(CgoConfig::default())
            .catalog_store(Arc::new(FsBlobStore::new(std::env::temp_dir())))
            .matcher(Arc::new(KeywordMatcher::new()))
    }

    #[test]
    fn build_requires_store_and_matcher() {
        let missing_store = Orchestrator::builder(CgoConfig::default())
            .matcher(Arc::new(KeywordMatcher::new()))
            .build()
            .unwrap_err();
        assert!(matches!(missing_store, CgoError::Config(_)));

        let missing_matcher = Orchestrator::builder(CgoConfig::default())
            .catalog_store(Arc::new(FsBlobStore::new(".")))
            .build()
            .unwrap_err();
        assert!(matches!(missing_matcher, CgoError::Config(_)));
    }

    #[test]
    fn build_rejects_invalid_config() {
        let mut config = CgoConfig::default();
        config.agents.mailbox_capacity = 0;
        let err = Orchestrator::builder(config)
            .catalog_store(Arc::new(FsBlobStore::new(".")))
            .matcher(Arc::new(KeywordMatcher::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, CgoError::Config(ConfigError::Invalid(_))));
    }

    #[tokio::test]
    async fn resolve_is_infallible_and_fetch_reports_not_found() {
        let orchestrator = builder().build().unwrap();
        let identity = AgentIdentity::new("never-created");

        let local = orchestrator.resolve_agent(&identity, false);
        let remote = orchestrator.resolve_agent(&identity, true);
        assert_eq!(local, remote);

        let err = orchestrator.fetch_state(&local).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn fetch_returns_written_state() {
        let orchestrator = builder().build().unwrap();
        let identity = AgentIdentity::new("agent-a");
        let handle = orchestrator.resolve_agent(&identity, false);

        let state = SessionState::new(identity.clone()).with_content("projectName", "demo".into());
        handle.set_state(state.clone()).await.unwrap();

        assert_eq!(orchestrator.fetch_state(&handle).await.unwrap(), state);
    }

    #[tokio::test]
    async fn clone_of_unknown_source_is_not_found() {
        let orchestrator = builder().build().unwrap();
        let err = orchestrator
            .clone_agent(&AgentIdentity::new("ghost"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn missing_catalog_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::builder(CgoConfig::default())
            .catalog_store(Arc::new(FsBlobStore::new(dir.path())))
            .matcher(Arc::new(KeywordMatcher::new()))
            .build()
            .unwrap();

        let err = orchestrator
            .select_template_for_query("a go service", &InferenceContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CatalogUnavailable);
    }
}
