//! Matcher inputs and outputs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller context forwarded to the inference matcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceContext {
    /// Agent the request belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    /// User making the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Model override for the matcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Free-form pass-through values
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl InferenceContext {
    /// Create empty context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With agent id
    #[must_use]
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// With user id
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// With model override
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Estimated project complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Single screen or endpoint
    Simple,
    /// A handful of features
    Moderate,
    /// Many interacting features
    Complex,
}

/// Result of inference matching
///
/// Only `selected_template_name` drives the pipeline; the other fields are
/// matcher annotations returned to the caller unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSelection {
    /// Chosen catalog entry; `None` means no match
    #[serde(default)]
    pub selected_template_name: Option<String>,

    /// Why the matcher chose it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Detected use case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,

    /// Estimated complexity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,

    /// Suggested visual style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_selection: Option<String>,

    /// Suggested project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl TemplateSelection {
    /// Selection naming `name`
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            selected_template_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Selection naming nothing
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// With reasoning
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Selected name, treating the empty string as no selection
    #[must_use]
    pub fn template_name(&self) -> Option<&str> {
        self.selected_template_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_no_selection() {
        assert_eq!(TemplateSelection::named("").template_name(), None);
        assert_eq!(TemplateSelection::none().template_name(), None);
        assert_eq!(TemplateSelection::named("x").template_name(), Some("x"));
    }

    #[test]
    fn selection_parses_camel_case() {
        let selection: TemplateSelection = serde_json::from_str(
            r#"{"selectedTemplateName": "react-vite", "useCase": "Dashboard", "complexity": "moderate"}"#,
        )
        .unwrap();

        assert_eq!(selection.template_name(), Some("react-vite"));
        assert_eq!(selection.use_case.as_deref(), Some("Dashboard"));
        assert_eq!(selection.complexity, Some(Complexity::Moderate));
    }

    #[test]
    fn null_name_parses_as_none() {
        let selection: TemplateSelection =
            serde_json::from_str(r#"{"selectedTemplateName": null}"#).unwrap();
        assert_eq!(selection.template_name(), None);
    }

    #[test]
    fn context_builder() {
        let ctx = InferenceContext::new()
            .with_agent_id("a1")
            .with_user_id("u1")
            .with_metadata("region", "eu");
        assert_eq!(ctx.agent_id.as_deref(), Some("a1"));
        assert_eq!(ctx.metadata.get("region").map(String::as_str), Some("eu"));
    }
}
