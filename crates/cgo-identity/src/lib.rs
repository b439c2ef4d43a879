//! CGO Identity - opaque tokens naming agents and sandbox sessions
//!
//! Provides:
//! - [`AgentIdentity`] for addressing one logical session actor
//! - [`SandboxSessionId`] for naming a future execution environment
//! - [`IdGenerator`] with ULID and UUIDv4 implementations
//!
//! Tokens are opaque: callers must not parse or assume any structure.
//!
//! # Example
//!
//! ```rust
//! use cgo_identity::{AgentIdentity, IdGenerator, UlidGenerator};
//!
//! let ids = UlidGenerator;
//! let agent = AgentIdentity::from(ids.generate());
//! assert!(!agent.as_str().is_empty());
//! ```

#![warn(unreachable_pub)]

pub mod generator;

pub use generator::{IdFormat, IdGenerator, UlidGenerator, UuidV4Generator};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, globally-unique token addressing one agent
///
/// Resolving the same identity always yields a handle to the same logical
/// actor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentIdentity(String);

impl AgentIdentity {
    /// Wrap an existing token
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Mint a fresh identity from a generator
    #[inline]
    #[must_use]
    pub fn generate(ids: &dyn IdGenerator) -> Self {
        Self(ids.generate())
    }

    /// Borrow the raw token
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw token
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AgentIdentity {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AgentIdentity {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl AsRef<str> for AgentIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Token naming the execution environment a template request will run in
///
/// Independent of any [`AgentIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SandboxSessionId(String);

impl SandboxSessionId {
    /// Mint a fresh sandbox session id
    #[inline]
    #[must_use]
    pub fn generate(ids: &dyn IdGenerator) -> Self {
        Self(ids.generate())
    }

    /// Borrow the raw token
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SandboxSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SandboxSessionId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
