//! CGO configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [agents]
//! location_hint = "enam"
//! mailbox_capacity = 64
//! id_format = "ulid"
//!
//! [templates]
//! catalog_key = "template_catalog.json"
//! fetch_timeout_ms = 10000
//! inference_timeout_ms = 60000
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use cgo_agent::{LocationHint, DEFAULT_MAILBOX_CAPACITY};
use cgo_identity::IdFormat;
use cgo_template::{SelectorConfig, CATALOG_KEY, DEFAULT_FETCH_TIMEOUT, DEFAULT_INFERENCE_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file that failed to read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config value: {0}")]
    Invalid(String),

    /// Logging could not be installed
    #[error("telemetry setup failed: {0}")]
    Telemetry(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CgoConfig {
    /// Agent addressing
    pub agents: AgentsConfig,
    /// Template selection
    pub templates: TemplatesConfig,
    /// Logging
    pub logging: LoggingConfig,
}

/// Agent addressing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Placement hint for newly created agents
    pub location_hint: String,
    /// Mailbox depth of in-process actors
    pub mailbox_capacity: usize,
    /// Token format for minted identities
    pub id_format: IdFormat,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            location_hint: LocationHint::default().as_str().to_string(),
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            id_format: IdFormat::default(),
        }
    }
}

/// Template selection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Blob key of the catalog document
    pub catalog_key: String,
    /// Catalog read budget in milliseconds
    pub fetch_timeout_ms: u64,
    /// Matcher budget in milliseconds
    pub inference_timeout_ms: u64,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            catalog_key: CATALOG_KEY.to_string(),
            fetch_timeout_ms: duration_ms(DEFAULT_FETCH_TIMEOUT),
            inference_timeout_ms: duration_ms(DEFAULT_INFERENCE_TIMEOUT),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl CgoConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// With placement hint
    #[inline]
    #[must_use]
    pub fn with_location_hint(mut self, hint: impl Into<String>) -> Self {
        self.agents.location_hint = hint.into();
        self
    }

    /// With identity token format
    #[inline]
    #[must_use]
    pub fn with_id_format(mut self, format: IdFormat) -> Self {
        self.agents.id_format = format;
        self
    }

    /// With catalog key
    #[inline]
    #[must_use]
    pub fn with_catalog_key(mut self, key: impl Into<String>) -> Self {
        self.templates.catalog_key = key.into();
        self
    }

    /// With catalog and inference budgets
    #[inline]
    #[must_use]
    pub fn with_timeouts(mut self, fetch: Duration, inference: Duration) -> Self {
        self.templates.fetch_timeout_ms = duration_ms(fetch);
        self.templates.inference_timeout_ms = duration_ms(inference);
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agents.location_hint.trim().is_empty() {
            return Err(ConfigError::Invalid("agents.location_hint must not be empty".into()));
        }
        if self.agents.mailbox_capacity == 0 {
            return Err(ConfigError::Invalid("agents.mailbox_capacity must be at least 1".into()));
        }
        if self.templates.catalog_key.trim().is_empty() {
            return Err(ConfigError::Invalid("templates.catalog_key must not be empty".into()));
        }
        if self.templates.fetch_timeout_ms == 0 || self.templates.inference_timeout_ms == 0 {
            return Err(ConfigError::Invalid("template timeouts must be positive".into()));
        }
        Ok(())
    }

    /// Placement hint as a typed value
    #[must_use]
    pub fn location_hint(&self) -> LocationHint {
        LocationHint::new(self.agents.location_hint.clone())
    }

    /// Settings for the selection pipeline
    #[must_use]
    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig::new()
            .with_catalog_key(self.templates.catalog_key.clone())
            .with_fetch_timeout(Duration::from_millis(self.templates.fetch_timeout_ms))
            .with_inference_timeout(Duration::from_millis(self.templates.inference_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = CgoConfig::from_toml_str("").unwrap();
        assert_eq!(config, CgoConfig::default());
        assert_eq!(config.agents.location_hint, "enam");
        assert_eq!(config.templates.catalog_key, "template_catalog.json");
        assert_eq!(config.templates.fetch_timeout_ms, 10_000);
        assert_eq!(config.templates.inference_timeout_ms, 60_000);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = CgoConfig::from_toml_str(
            r#"
            [agents]
            id_format = "uuid"

            [templates]
            inference_timeout_ms = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.agents.id_format, IdFormat::Uuid);
        assert_eq!(config.agents.mailbox_capacity, DEFAULT_MAILBOX_CAPACITY);
        assert_eq!(config.selector_config().inference_timeout, Duration::from_millis(2500));
        assert_eq!(config.selector_config().fetch_timeout, DEFAULT_FETCH_TIMEOUT);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = CgoConfig::from_toml_str("[templates]\nfetch_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_type_is_parse_error() {
        let err = CgoConfig::from_toml_str("[agents]\nmailbox_capacity = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cgo.toml");
        std::fs::write(&path, "[logging]\njson = true\n").unwrap();

        let config = CgoConfig::load(&path).unwrap();
        assert!(config.logging.json);

        let missing = CgoConfig::load(dir.path().join("nope.toml")).unwrap_err();
        let ConfigError::Io { path: failed, source } = &missing else {
            panic!("expected io error, got {missing:?}");
        };
        assert_eq!(failed, &dir.path().join("nope.toml"));
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn builder_methods() {
        let config = CgoConfig::new()
            .with_location_hint("weur")
            .with_catalog_key("v2/catalog.json")
            .with_timeouts(Duration::from_millis(5), Duration::from_millis(7));

        assert_eq!(config.location_hint().as_str(), "weur");
        let selector = config.selector_config();
        assert_eq!(selector.catalog_key, "v2/catalog.json");
        assert_eq!(selector.fetch_timeout, Duration::from_millis(5));
        assert_eq!(selector.inference_timeout, Duration::from_millis(7));
    }
}
