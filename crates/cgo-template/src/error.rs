//! Error types for template selection
//!
//! Provides error handling for:
//! - Catalog retrieval (blob store reads, parsing)
//! - Inference matching
//! - Selection validation

use std::path::PathBuf;

/// Selection pipeline failures
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// Catalog missing, unreadable, malformed or timed out
    #[error("template catalog unavailable ({key}): {reason}")]
    CatalogUnavailable {
        /// Blob key the catalog was read from
        key: String,
        /// Why the catalog could not be used
        reason: String,
    },

    /// Matcher named no template
    #[error("no suitable template found for query: {query}")]
    NoSuitableTemplate {
        /// Project request the matcher was given
        query: String,
    },

    /// Matcher named a template the catalog does not contain
    #[error("selected template not found in catalog: {name}")]
    SelectionNotFound {
        /// Template name the matcher returned
        name: String,
    },

    /// Unexpected collaborator failure
    #[error("{operation} failed: {message}")]
    Orchestration {
        /// Pipeline stage that failed
        operation: &'static str,
        /// Underlying failure
        message: String,
    },
}

impl SelectionError {
    /// Create catalog unavailable error
    pub fn catalog_unavailable(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create orchestration error
    pub fn orchestration(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Orchestration {
            operation,
            message: message.into(),
        }
    }
}

/// Blob store read failures
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    /// Key cannot address a blob in this store
    #[error("invalid blob key: '{0}'")]
    InvalidKey(String),

    /// IO error during read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Backend-specific failure
    #[error("blob store error: {0}")]
    Backend(String),
}

/// Inference matcher failures
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// Inference call failed
    #[error("inference failed: {0}")]
    Inference(String),

    /// Inference answered with something that is not a selection
    #[error("invalid inference response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_unavailable_display() {
        let err = SelectionError::catalog_unavailable("template_catalog.json", "not found");
        assert_eq!(
            err.to_string(),
            "template catalog unavailable (template_catalog.json): not found"
        );
    }

    #[test]
    fn orchestration_display() {
        let err = SelectionError::orchestration("inference", "timed out after 10ms");
        assert_eq!(err.to_string(), "inference failed: timed out after 10ms");
    }

    #[test]
    fn variant_fields_reach_the_message() {
        let err = SelectionError::NoSuitableTemplate {
            query: "a chess engine".into(),
        };
        assert_eq!(err.to_string(), "no suitable template found for query: a chess engine");

        let err = SelectionError::SelectionNotFound {
            name: "vite-react".into(),
        };
        assert_eq!(err.to_string(), "selected template not found in catalog: vite-react");
    }
}
