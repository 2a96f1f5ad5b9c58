//! Runtime configuration, read from YAML.
//!
//! Every field has a default, so an empty document is a valid config.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Order in which aggregated export names are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOrder {
    /// Explicit names first, then each wildcard source in turn.
    #[default]
    FirstSeen,
    Sorted,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Top-level names starting with this prefix are left out of wildcard
    /// re-exports.
    pub private_prefix: String,
    pub export_order: ExportOrder,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            private_prefix: "_".to_string(),
            export_order: ExportOrder::FirstSeen,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Reading {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Parsing runtime config")]
    Parse(#[from] serde_yaml::Error),
}

impl RuntimeConfig {
    /// Whether a top-level name stays out of wildcard re-exports. An empty
    /// prefix marks nothing private.
    pub fn is_private(&self, name: &str) -> bool {
        !self.private_prefix.is_empty() && name.starts_with(self.private_prefix.as_str())
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }
}
