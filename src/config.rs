//! Configuration, read from TOML.
//!
//! ```toml
//! namespace = "http://example.org/prov/"
//! backend = "deferred"
//! format = "turtle"
//! data_dir = ".provo"
//! log_filter = "provo=debug"
//!
//! [prefixes]
//! ex = "http://example.org/prov/"
//! ```
//!
//! Every field is optional.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::BackendKind;
use crate::error::{ProvError, ProvResult};
use crate::graph::GraphFormat;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "http://example.org/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvConfig {
    /// Prefix for generated resource URIs.
    pub namespace: String,
    /// Which builder backend to construct.
    pub backend: BackendKind,
    /// Output syntax for the immediate backend.
    pub format: GraphFormat,
    /// Directory of a persistent oxigraph store. `None` for memory-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// `tracing-subscriber` filter directive.
    pub log_filter: String,
    /// Extra prefixes for serialized output.
    pub prefixes: BTreeMap<String, String>,
}

impl Default for ProvConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            backend: BackendKind::Immediate,
            format: GraphFormat::Turtle,
            data_dir: None,
            log_filter: "info".to_string(),
            prefixes: BTreeMap::new(),
        }
    }
}

impl ProvConfig {
    pub fn from_toml_str(text: &str) -> ProvResult<Self> {
        toml::from_str(text).map_err(|e| ProvError::Config {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> ProvResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ProvError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ProvError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_toml_string(&self) -> ProvResult<String> {
        toml::to_string_pretty(self).map_err(|e| ProvError::Serialization {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(ProvConfig::from_toml_str("").unwrap(), ProvConfig::default());
    }

    #[test]
    fn parse_all_fields() {
        let config = ProvConfig::from_toml_str(
            r#"
            namespace = "urn:prov:"
            backend = "deferred"
            format = "ntriples"
            data_dir = "/tmp/provo"
            log_filter = "debug"

            [prefixes]
            ex = "urn:prov:"
            "#,
        )
        .unwrap();
        assert_eq!(config.namespace, "urn:prov:");
        assert_eq!(config.backend, BackendKind::Deferred);
        assert_eq!(config.format, GraphFormat::NTriples);
        assert_eq!(config.data_dir.as_deref(), Some(Path::new("/tmp/provo")));
        assert_eq!(config.prefixes["ex"], "urn:prov:");
    }

    #[test]
    fn unknown_backend_is_config_error() {
        let err = ProvConfig::from_toml_str(r#"backend = "remote""#).unwrap_err();
        assert!(matches!(err, ProvError::Config { .. }));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("provo.toml");
        let mut config = ProvConfig::default();
        config.backend = BackendKind::Deferred;
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(ProvConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ProvConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ProvError::Config { .. }));
    }
}
