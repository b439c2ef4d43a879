//! Inference matcher contract
//!
//! The matcher is function-shaped: given the caller context, the free-text
//! query and the catalog, it returns exactly one [`TemplateSelection`]. The
//! production implementation calls an LLM and lives outside this crate.

pub mod keyword;

pub use keyword::KeywordMatcher;

use crate::catalog::TemplateCatalogEntry;
use crate::error::MatcherError;
use crate::selection::{InferenceContext, TemplateSelection};
use async_trait::async_trait;
use std::fmt::Debug;

/// Matches a query against catalog entries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceMatcher: Send + Sync + Debug {
    /// Pick at most one entry for `query`
    async fn select_template(
        &self,
        context: &InferenceContext,
        query: &str,
        catalog: &[TemplateCatalogEntry],
    ) -> Result<TemplateSelection, MatcherError>;
}
