//! Application configuration.
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables:
//!
//! - `PENPAL_ORIGIN`: origin used in share links
//! - `PENPAL_ROUTE_PREFIX`: path segment letters are served under
//! - `PENPAL_STORE_URL`: use the remote store at this base URL

use crate::link::DEFAULT_ROUTE_PREFIX;
use crate::tools::PlacementPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_ORIGIN: &str = "PENPAL_ORIGIN";
pub const ENV_ROUTE_PREFIX: &str = "PENPAL_ROUTE_PREFIX";
pub const ENV_STORE_URL: &str = "PENPAL_STORE_URL";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where sealed letters are stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    #[default]
    Memory,
    /// JSON files; `None` uses the per-user data directory.
    File {
        #[serde(default)]
        dir: Option<PathBuf>,
    },
    Remote { base_url: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenPalConfig {
    /// Origin for share links, e.g. `https://penpal.example`.
    pub origin: String,
    pub route_prefix: String,
    pub placement_policy: PlacementPolicy,
    pub store: StoreConfig,
}

impl Default for PenPalConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            placement_policy: PlacementPolicy::default(),
            store: StoreConfig::default(),
        }
    }
}

impl PenPalConfig {
    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                log::debug!("config {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(origin) = get(ENV_ORIGIN) {
            self.origin = origin;
        }
        if let Some(prefix) = get(ENV_ROUTE_PREFIX) {
            self.route_prefix = prefix;
        }
        if let Some(base_url) = get(ENV_STORE_URL) {
            self.store = StoreConfig::Remote { base_url };
        }
    }
}
