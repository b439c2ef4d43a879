//! Error facade for CGO
//!
//! Every entry point reports a [`CgoError`]. Callers that only care about
//! the failure class use [`CgoError::kind`]:
//! - `NotFound` - agent never initialized
//! - `CatalogUnavailable` - catalog missing, unreadable, malformed or slow
//! - `NoSuitableTemplate` - matcher named nothing
//! - `SelectionNotFound` - matcher named an unknown template
//! - `Orchestration` - anything else, with context preserved

use crate::config::ConfigError;
use cgo_agent::AgentError;
use cgo_template::SelectionError;
use std::fmt;

/// Main CGO error type
#[derive(Debug, thiserror::Error)]
pub enum CgoError {
    /// Agent addressing or state access failed
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// Template selection failed
    #[error("template selection error: {0}")]
    Selection(#[from] SelectionError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failure class of a [`CgoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Agent has never been initialized
    NotFound,
    /// Template catalog cannot be obtained
    CatalogUnavailable,
    /// Matcher selected no template
    NoSuitableTemplate,
    /// Matcher selected a template absent from the catalog
    SelectionNotFound,
    /// Unexpected collaborator failure
    Orchestration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not_found",
            Self::CatalogUnavailable => "catalog_unavailable",
            Self::NoSuitableTemplate => "no_suitable_template",
            Self::SelectionNotFound => "selection_not_found",
            Self::Orchestration => "orchestration",
        };
        f.write_str(name)
    }
}

impl CgoError {
    /// Failure class
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Agent(AgentError::NotFound(_)) => ErrorKind::NotFound,
            Self::Agent(AgentError::Orchestration { .. }) => ErrorKind::Orchestration,
            Self::Selection(SelectionError::CatalogUnavailable { .. }) => {
                ErrorKind::CatalogUnavailable
            }
            Self::Selection(SelectionError::NoSuitableTemplate { .. }) => {
                ErrorKind::NoSuitableTemplate
            }
            Self::Selection(SelectionError::SelectionNotFound { .. }) => {
                ErrorKind::SelectionNotFound
            }
            Self::Selection(SelectionError::Orchestration { .. }) | Self::Config(_) => {
                ErrorKind::Orchestration
            }
        }
    }

    /// Check if error is retryable
    ///
    /// Collaborator failures and catalog outages may clear on their own;
    /// a missing agent or a bad selection will not.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Config(_))
            && matches!(
                self.kind(),
                ErrorKind::Orchestration | ErrorKind::CatalogUnavailable
            )
    }

    /// Check if error reports a missing agent
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgo_identity::AgentIdentity;

    #[test]
    fn kinds_follow_source_variant() {
        let id = AgentIdentity::new("agent-1");
        let cases: Vec<(CgoError, ErrorKind)> = vec![
            (AgentError::NotFound(id.clone()).into(), ErrorKind::NotFound),
            (
                AgentError::orchestration("set_state", &id, "mailbox closed").into(),
                ErrorKind::Orchestration,
            ),
            (
                SelectionError::catalog_unavailable("template_catalog.json", "missing").into(),
                ErrorKind::CatalogUnavailable,
            ),
            (
                SelectionError::NoSuitableTemplate { query: "q".into() }.into(),
                ErrorKind::NoSuitableTemplate,
            ),
            (
                SelectionError::SelectionNotFound { name: "ghost".into() }.into(),
                ErrorKind::SelectionNotFound,
            ),
            (
                SelectionError::orchestration("select_template", "boom").into(),
                ErrorKind::Orchestration,
            ),
            (
                ConfigError::Invalid("bad".into()).into(),
                ErrorKind::Orchestration,
            ),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error}");
        }
    }

    #[test]
    fn retryable_classes() {
        let id = AgentIdentity::new("agent-1");
        assert!(CgoError::from(AgentError::orchestration("get_full_state", &id, "x")).is_retryable());
        assert!(CgoError::from(SelectionError::catalog_unavailable("k", "timed out")).is_retryable());

        assert!(!CgoError::from(AgentError::NotFound(id)).is_retryable());
        assert!(!CgoError::from(SelectionError::SelectionNotFound { name: "n".into() }).is_retryable());
        assert!(!CgoError::from(ConfigError::Invalid("bad".into())).is_retryable());
    }

    #[test]
    fn message_keeps_context() {
        let id = AgentIdentity::new("agent-9");
        let error = CgoError::from(AgentError::orchestration("set_state", &id, "mailbox closed"));
        let text = error.to_string();
        assert!(text.contains("set_state"));
        assert!(text.contains("agent-9"));
        assert!(text.contains("mailbox closed"));
    }
}
