//! TOML configuration for the doorstep binary.

use std::path::Path;

use doorstep_dispatch::TransportTimeouts;
use serde::Deserialize;
use thiserror::Error;

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration.
///
/// Everything is optional; an absent file or section falls back to
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Per-call transport timeout overrides
    #[serde(default)]
    pub timeouts: TransportTimeouts,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
