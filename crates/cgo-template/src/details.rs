//! Consumer-facing template descriptor
//!
//! [`TemplateDetails`] is what a new session starts from. Files and the file
//! tree are filled in later by the scaffold fetcher; at selection time they
//! are empty.

use crate::catalog::TemplateCatalogEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary used when the catalog entry has no description
pub const DEFAULT_SELECTION_SUMMARY: &str = "Template for code generation";

/// Language named in the usage sentence when the entry has none
pub const DEFAULT_USAGE_LANGUAGE: &str = "web";

/// Human-facing description pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescription {
    /// Why this template fits
    pub selection: String,
    /// How to use it
    pub usage: String,
}

/// One scaffold file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFile {
    /// Path relative to the project root
    pub file_path: String,
    /// File contents
    pub file_contents: String,
}

/// Kind of file tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileTreeNodeType {
    /// Directory
    Directory,
    /// Regular file
    File,
}

/// File tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTreeNode {
    /// Absolute path within the project
    pub path: String,
    /// Node kind
    #[serde(rename = "type")]
    pub node_type: FileTreeNodeType,
    /// Children (directories only)
    #[serde(default)]
    pub children: Vec<FileTreeNode>,
}

impl FileTreeNode {
    /// Empty project root
    #[must_use]
    pub fn empty_root() -> Self {
        Self {
            path: "/".to_string(),
            node_type: FileTreeNodeType::Directory,
            children: Vec::new(),
        }
    }
}

/// Resolved template descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetails {
    /// Catalog name
    pub name: String,
    /// Selection summary and usage sentence
    pub description: TemplateDescription,
    /// Scaffold files
    pub files: Vec<TemplateFile>,
    /// Scaffold layout
    pub file_tree: FileTreeNode,
    /// Primary language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Frameworks
    pub frameworks: Vec<String>,
    /// Package name -> version
    pub deps: BTreeMap<String, String>,
    /// Files generation must leave alone
    pub dont_touch_files: Vec<String>,
    /// Files hidden from generation prompts
    pub redacted_files: Vec<String>,
}

impl TemplateDetails {
    /// Project a catalog entry into a descriptor with nothing fetched yet
    #[must_use]
    pub fn from_entry(entry: &TemplateCatalogEntry) -> Self {
        let selection = entry
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_SELECTION_SUMMARY.to_string());
        let usage = format!(
            "Use this template for {} development",
            entry.language.as_deref().unwrap_or(DEFAULT_USAGE_LANGUAGE)
        );

        Self {
            name: entry.name.clone(),
            description: TemplateDescription { selection, usage },
            files: Vec::new(),
            file_tree: FileTreeNode::empty_root(),
            language: entry.language.clone(),
            frameworks: entry.frameworks.clone(),
            deps: BTreeMap::new(),
            dont_touch_files: Vec::new(),
            redacted_files: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn projects_entry_fields() {
        let entry = TemplateCatalogEntry::new("starter-basic")
            .with_language("go")
            .with_frameworks(["web"]);

        let details = TemplateDetails::from_entry(&entry);
        assert_eq!(details.name, "starter-basic");
        assert_eq!(details.language.as_deref(), Some("go"));
        assert_eq!(details.frameworks, vec!["web".to_string()]);
        assert_eq!(details.description.selection, DEFAULT_SELECTION_SUMMARY);
        assert_eq!(details.description.usage, "Use this template for go development");
        assert!(details.files.is_empty());
        assert!(details.file_tree.children.is_empty());
        assert!(details.deps.is_empty());
        assert!(details.dont_touch_files.is_empty());
        assert!(details.redacted_files.is_empty());
    }

    #[test]
    fn missing_language_uses_placeholder() {
        let entry = TemplateCatalogEntry::new("landing").with_description("Static landing page");
        let details = TemplateDetails::from_entry(&entry);

        assert_eq!(details.description.selection, "Static landing page");
        assert_eq!(details.description.usage, "Use this template for web development");
        assert_eq!(details.language, None);
    }

    #[test]
    fn serializes_wire_shape() {
        let details = TemplateDetails::from_entry(&TemplateCatalogEntry::new("t").with_language("ts"));
        let value = serde_json::to_value(&details).unwrap();

        assert_eq!(value["fileTree"], json!({"path": "/", "type": "directory", "children": []}));
        assert_eq!(value["dontTouchFiles"], json!([]));
        assert_eq!(value["redactedFiles"], json!([]));
        assert_eq!(value["deps"], json!({}));
    }
}
