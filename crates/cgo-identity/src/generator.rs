//! ID generation
//!
//! Collision-free opaque tokens on demand. ULID is the default because it
//! sorts by creation time, which keeps logs readable.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use ulid::Ulid;
use uuid::Uuid;

/// Source of fresh opaque identity tokens
pub trait IdGenerator: Send + Sync + Debug {
    /// Produce a token never returned before
    fn generate(&self) -> String;
}

/// ULID-backed generator (26 chars, Crockford base32)
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn generate(&self) -> String {
        Ulid::new().to_string()
    }
}

/// UUIDv4-backed generator (36 chars, hyphenated)
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Token format selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdFormat {
    /// ULID tokens
    #[default]
    Ulid,
    /// Hyphenated UUIDv4 tokens
    Uuid,
}

impl IdFormat {
    /// Build the generator for this format
    #[must_use]
    pub fn generator(self) -> Arc<dyn IdGenerator> {
        match self {
            IdFormat::Ulid => Arc::new(UlidGenerator),
            IdFormat::Uuid => Arc::new(UuidV4Generator),
        }
    }
}
