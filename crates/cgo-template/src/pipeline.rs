//! Template Selector Pipeline
//!
//! Resolves a free-text project request into a [`TemplateDetails`].
//!
//! # Workflow
//! 1. Fetch the catalog from the blob store (fatal if missing or malformed)
//! 2. Mint a sandbox session id
//! 3. Ask the inference matcher for a selection
//! 4. Reject an empty selection
//! 5. Reject a selection naming an entry the catalog does not contain
//! 6. Project the entry into a descriptor
//!
//! Each call re-reads the catalog and shares nothing with other calls, so
//! invocations can run in parallel. Nothing is written anywhere, so dropping
//! the future mid-way needs no cleanup. There is no retry; callers decide.

use crate::catalog::{TemplateCatalog, CATALOG_KEY};
use crate::details::TemplateDetails;
use crate::error::SelectionError;
use crate::matcher::InferenceMatcher;
use crate::selection::{InferenceContext, TemplateSelection};
use crate::store::BlobStore;
use cgo_identity::{IdGenerator, SandboxSessionId};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Default catalog fetch budget
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default inference budget
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(60);

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Blob key of the catalog document
    pub catalog_key: String,
    /// Budget for the catalog read
    pub fetch_timeout: Duration,
    /// Budget for the matcher call
    pub inference_timeout: Duration,
}

impl SelectorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With catalog key
    #[inline]
    #[must_use]
    pub fn with_catalog_key(mut self, key: impl Into<String>) -> Self {
        self.catalog_key = key.into();
        self
    }

    /// With catalog fetch budget
    #[inline]
    #[must_use]
    pub fn with_fetch_timeout(mut self, budget: Duration) -> Self {
        self.fetch_timeout = budget;
        self
    }

    /// With inference budget
    #[inline]
    #[must_use]
    pub fn with_inference_timeout(mut self, budget: Duration) -> Self {
        self.inference_timeout = budget;
        self
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            catalog_key: CATALOG_KEY.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            inference_timeout: DEFAULT_INFERENCE_TIMEOUT,
        }
    }
}

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStage {
    /// Not started
    Idle,
    /// Reading the catalog
    FetchingCatalog,
    /// Waiting on the matcher
    Selecting,
    /// Descriptor produced
    Resolved,
    /// Terminal failure
    Failed,
}

impl SelectionStage {
    /// Check if no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Failed)
    }
}

impl fmt::Display for SelectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::FetchingCatalog => "fetching_catalog",
            Self::Selecting => "selecting",
            Self::Resolved => "resolved",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Successful pipeline output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResolution {
    /// Names the execution environment for this request
    pub sandbox_session_id: SandboxSessionId,
    /// Resolved descriptor
    pub template_details: TemplateDetails,
    /// Matcher output, unchanged
    pub selection: TemplateSelection,
}

/// Stage tracking for one invocation
struct Run<'a> {
    query: &'a str,
    stage: SelectionStage,
}

impl<'a> Run<'a> {
    fn new(query: &'a str) -> Self {
        Self {
            query,
            stage: SelectionStage::Idle,
        }
    }

    fn advance(&mut self, next: SelectionStage) {
        tracing::debug!(query = self.query, from = %self.stage, to = %next, "selection stage");
        self.stage = next;
    }

    fn fail(&mut self, error: SelectionError) -> SelectionError {
        tracing::error!(query = self.query, stage = %self.stage, error = %error, "template selection failed");
        self.stage = SelectionStage::Failed;
        error
    }
}

/// Runs the selection pipeline against injected collaborators
#[derive(Debug, Clone)]
pub struct TemplateSelector {
    store: Arc<dyn BlobStore>,
    matcher: Arc<dyn InferenceMatcher>,
    ids: Arc<dyn IdGenerator>,
    config: SelectorConfig,
}

impl TemplateSelector {
    /// Create selector with default configuration
    #[must_use]
    pub fn new(
        store: Arc<dyn BlobStore>,
        matcher: Arc<dyn InferenceMatcher>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            matcher,
            ids,
            config: SelectorConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Resolve `query` into a template descriptor
    ///
    /// # Errors
    /// - `SelectionError::CatalogUnavailable` if the catalog cannot be read or parsed
    /// - `SelectionError::NoSuitableTemplate` if the matcher names nothing
    /// - `SelectionError::SelectionNotFound` if the named entry is not in the catalog
    /// - `SelectionError::Orchestration` if the matcher fails or times out
    pub async fn select_template_for_query(
        &self,
        query: &str,
        context: &InferenceContext,
    ) -> Result<TemplateResolution, SelectionError> {
        let mut run = Run::new(query);

        run.advance(SelectionStage::FetchingCatalog);
        let catalog = self.fetch_catalog().await.map_err(|e| run.fail(e))?;
        tracing::info!(count = catalog.len(), "fetched template catalog");

        let sandbox_session_id = SandboxSessionId::generate(self.ids.as_ref());

        run.advance(SelectionStage::Selecting);
        let selection = self
            .match_query(context, query, &catalog)
            .await
            .map_err(|e| run.fail(e))?;
        tracing::info!(selected = ?selection.selected_template_name, "selected template");

        let Some(name) = selection.template_name() else {
            return Err(run.fail(SelectionError::NoSuitableTemplate {
                query: query.to_string(),
            }));
        };

        let Some(entry) = catalog.find(name) else {
            return Err(run.fail(SelectionError::SelectionNotFound {
                name: name.to_string(),
            }));
        };

        let template_details = TemplateDetails::from_entry(entry);
        run.advance(SelectionStage::Resolved);
        tracing::info!(template = %template_details.name, sandbox_session_id = %sandbox_session_id, "using minimal template details");

        Ok(TemplateResolution {
            sandbox_session_id,
            template_details,
            selection,
        })
    }

    /// Read and parse the catalog within the fetch budget
    async fn fetch_catalog(&self) -> Result<TemplateCatalog, SelectionError> {
        let key = self.config.catalog_key.as_str();

        let blob = match timeout(self.config.fetch_timeout, self.store.get(key)).await {
            Err(_) => {
                return Err(SelectionError::catalog_unavailable(
                    key,
                    format!("timed out after {}ms", self.config.fetch_timeout.as_millis()),
                ))
            }
            Ok(Err(e)) => return Err(SelectionError::catalog_unavailable(key, e.to_string())),
            Ok(Ok(None)) => return Err(SelectionError::catalog_unavailable(key, "not found")),
            Ok(Ok(Some(blob))) => blob,
        };

        TemplateCatalog::from_json(&blob)
            .map_err(|e| SelectionError::catalog_unavailable(key, format!("malformed catalog: {e}")))
    }

    /// Call the matcher within the inference budget
    async fn match_query(
        &self,
        context: &InferenceContext,
        query: &str,
        catalog: &TemplateCatalog,
    ) -> Result<TemplateSelection, SelectionError> {
        let call = self
            .matcher
            .select_template(context, query, catalog.entries());

        match timeout(self.config.inference_timeout, call).await {
            Err(_) => Err(SelectionError::orchestration(
                "inference",
                format!("timed out after {}ms", self.config.inference_timeout.as_millis()),
            )),
            Ok(Err(e)) => Err(SelectionError::orchestration("inference", e.to_string())),
            Ok(Ok(selection)) => Ok(selection),
        }
    }
}
