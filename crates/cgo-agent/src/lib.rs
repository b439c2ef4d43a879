//! CGO Agent - single-owner session actors
//!
//! Addresses per-session agents by opaque identity and exposes their state:
//! - [`AgentLocator`] resolves an identity to an [`AgentHandle`]
//! - [`fetch_state`] reads the full [`SessionState`]
//! - [`AgentCloner`] duplicates an agent under a fresh identity
//!
//! The actor runtime itself sits behind [`AgentDirectory`]; [`InMemoryDirectory`]
//! is an in-process implementation with one serial task per identity.
//!
//! # Example
//!
//! ```rust,ignore
//! use cgo_agent::{AgentCloner, AgentLocator, InMemoryDirectory};
//! use cgo_identity::{AgentIdentity, UlidGenerator};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), cgo_agent::AgentError> {
//! let locator = AgentLocator::new(Arc::new(InMemoryDirectory::new()));
//! let cloner = AgentCloner::new(locator.clone(), Arc::new(UlidGenerator));
//!
//! let cloned = cloner.clone_agent(&AgentIdentity::new("agent-1")).await?;
//! println!("cloned into {}", cloned.identity);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod accessor;
pub mod cloner;
pub mod directory;
pub mod error;
pub mod locator;
pub mod memory;
pub mod state;

pub use accessor::fetch_state;
pub use cloner::{AgentCloner, ClonedAgent};
pub use directory::{AgentDirectory, AgentStub, LocationHint};
pub use error::{AgentError, ReservedKeyError};
pub use locator::{AgentHandle, AgentLocator, JurisdictionMode};
pub use memory::{InMemoryDirectory, DEFAULT_MAILBOX_CAPACITY};
pub use state::{ClientReportedError, DevState, GenerationMarker, SessionState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
