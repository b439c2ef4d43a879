//! CGO Template - catalog matching and template resolution
//!
//! Turns a free-text project request into a [`TemplateDetails`] descriptor:
//!
//! ```text
//! BlobStore ──► TemplateCatalog ──► InferenceMatcher ──► validate ──► TemplateDetails
//!                                                                     + SandboxSessionId
//! ```
//!
//! The blob store and the matcher are collaborators behind traits;
//! [`FsBlobStore`] and [`KeywordMatcher`] are local implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use cgo_template::{FsBlobStore, InferenceContext, KeywordMatcher, TemplateSelector};
//! use cgo_identity::UlidGenerator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), cgo_template::SelectionError> {
//! let selector = TemplateSelector::new(
//!     Arc::new(FsBlobStore::new("./templates")),
//!     Arc::new(KeywordMatcher::new()),
//!     Arc::new(UlidGenerator),
//! );
//!
//! let resolution = selector
//!     .select_template_for_query("a react dashboard", &InferenceContext::new())
//!     .await?;
//! println!("{}", resolution.template_details.name);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod catalog;
pub mod details;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod selection;
pub mod store;

pub use catalog::{TemplateCatalog, TemplateCatalogEntry, CATALOG_KEY};
pub use details::{
    FileTreeNode, FileTreeNodeType, TemplateDescription, TemplateDetails, TemplateFile,
    DEFAULT_SELECTION_SUMMARY, DEFAULT_USAGE_LANGUAGE,
};
pub use error::{BlobStoreError, MatcherError, SelectionError};
pub use matcher::{InferenceMatcher, KeywordMatcher};
pub use pipeline::{
    SelectionStage, SelectorConfig, TemplateResolution, TemplateSelector,
    DEFAULT_FETCH_TIMEOUT, DEFAULT_INFERENCE_TIMEOUT,
};
pub use selection::{Complexity, InferenceContext, TemplateSelection};
pub use store::{BlobStore, FsBlobStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
