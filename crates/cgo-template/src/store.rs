//! Blob store contract and a filesystem-backed implementation

use crate::error::BlobStoreError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};

/// Keyed blob retrieval
#[async_trait]
pub trait BlobStore: Send + Sync + Debug {
    /// Read the blob stored under `key`
    ///
    /// Returns `Ok(None)` when no blob exists for the key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError>;
}

/// Blob store rooted at a directory; keys are relative file paths
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create store rooted at `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, BlobStoreError> {
        let relative = Path::new(key);
        let contained = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !contained {
            return Err(BlobStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BlobStoreError::Io { path, source }),
        }
    }
}
