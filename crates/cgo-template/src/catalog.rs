//! Template catalog
//!
//! The catalog is a JSON array of [`TemplateCatalogEntry`] stored under a
//! well-known key. It is re-read on every selection.

use serde::{Deserialize, Serialize};

/// Well-known key of the catalog document
pub const CATALOG_KEY: &str = "template_catalog.json";

/// One reusable scaffold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCatalogEntry {
    /// Unique key within the catalog
    pub name: String,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Primary language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Frameworks the scaffold ships with
    #[serde(default)]
    pub frameworks: Vec<String>,
}

impl TemplateCatalogEntry {
    /// Create entry with just a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            language: None,
            frameworks: Vec::new(),
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// With frameworks
    #[must_use]
    pub fn with_frameworks<I, S>(mut self, frameworks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frameworks = frameworks.into_iter().map(Into::into).collect();
        self
    }
}

/// Ordered collection of catalog entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    entries: Vec<TemplateCatalogEntry>,
}

impl TemplateCatalog {
    /// Create catalog from entries
    #[inline]
    #[must_use]
    pub fn new(entries: Vec<TemplateCatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse catalog document
    ///
    /// # Errors
    /// Returns the parse error for anything that is not a JSON array of entries.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Exact-name lookup; first entry wins on duplicates
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TemplateCatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// All entries in catalog order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[TemplateCatalogEntry] {
        &self.entries
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if catalog has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<TemplateCatalogEntry>> for TemplateCatalog {
    fn from(entries: Vec<TemplateCatalogEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_entries() {
        let raw = br#"[
            {"name": "starter-basic", "language": "go", "frameworks": ["web"]},
            {"name": "react-vite", "description": "React SPA", "extra": 1}
        ]"#;

        let catalog = TemplateCatalog::from_json(raw).unwrap();
        assert_eq!(catalog.len(), 2);

        let react = catalog.find("react-vite").unwrap();
        assert_eq!(react.description.as_deref(), Some("React SPA"));
        assert!(react.frameworks.is_empty());
        assert!(react.language.is_none());
    }

    #[test]
    fn rejects_non_array_document() {
        assert!(TemplateCatalog::from_json(br#"{"templates": []}"#).is_err());
        assert!(TemplateCatalog::from_json(b"not json").is_err());
    }

    #[test]
    fn entry_without_name_is_malformed() {
        assert!(TemplateCatalog::from_json(br#"[{"language": "go"}]"#).is_err());
    }

    #[test]
    fn find_is_exact() {
        let catalog = TemplateCatalog::new(vec![TemplateCatalogEntry::new("starter-basic")]);
        assert!(catalog.find("starter-basic").is_some());
        assert!(catalog.find("Starter-Basic").is_none());
        assert!(catalog.find("starter").is_none());
    }
}
