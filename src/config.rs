//! Generator configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::delegate::FormatOptions;

/// Error raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for a generation run, loadable from an `apigen.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Root directory the per-domain modules are written under.
    pub out_dir: PathBuf,
    /// Spaces per indentation level in the delegated artifact.
    pub indent: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("generated"),
            indent: 2,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Formatting options derived from this configuration.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            indent: self.indent,
        }
    }
}
