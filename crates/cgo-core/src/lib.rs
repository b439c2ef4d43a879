//! CGO Core - Code Generation Orchestrator
//!
//! Entry points for the code-generation platform:
//! - Resolve agents by identity and read their full state
//! - Clone an agent's persisted state into a fresh identity
//! - Resolve a free-text project request into a starter template
//!
//! # Example
//!
//! ```rust,ignore
//! use cgo_core::{CgoConfig, Orchestrator};
//! use cgo_template::{FsBlobStore, InferenceContext, KeywordMatcher};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), cgo_core::CgoError> {
//! let orchestrator = Orchestrator::builder(CgoConfig::default())
//!     .catalog_store(Arc::new(FsBlobStore::new("./templates")))
//!     .matcher(Arc::new(KeywordMatcher::new()))
//!     .build()?;
//!
//! let resolution = orchestrator
//!     .select_template_for_query("a go web service", &InferenceContext::new())
//!     .await?;
//! println!("{}", resolution.template_details.name);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod telemetry;

pub use config::{AgentsConfig, CgoConfig, ConfigError, LoggingConfig, TemplatesConfig};
pub use error::{CgoError, ErrorKind};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with CGO
    pub use crate::{CgoConfig, CgoError, ErrorKind, Orchestrator};
    pub use cgo_agent::{AgentHandle, ClonedAgent, SessionState};
    pub use cgo_identity::AgentIdentity;
    pub use cgo_template::{InferenceContext, TemplateDetails, TemplateResolution};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
