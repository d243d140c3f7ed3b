//! Ambient connection defaults.
//!
//! An optional TOML file (`~/.config/autosys-logs/config.toml`) can hold
//! connection defaults so routine invocations only need a job name. CLI
//! flags always take precedence, and passwords are never read from the
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backend::DEFAULT_REST_PORT;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Connection defaults. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub instance: Option<String>,
    pub username: Option<String>,
    pub insecure: Option<bool>,
}

impl Defaults {
    /// Load defaults from an explicit path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from the default location. A missing file is not an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Effective REST port: an explicit flag wins over the file value,
    /// even when it equals the built-in default.
    pub fn effective_port(&self, flag: Option<u16>) -> u16 {
        flag.or(self.port).unwrap_or(DEFAULT_REST_PORT)
    }
}

fn default_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config/autosys-logs/config.toml"))
}
