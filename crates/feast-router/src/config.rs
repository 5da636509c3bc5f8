// File: src/config.rs
// Purpose: Router configuration parsing from feast.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration file; only the `[router]` table is read here
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
}

/// Router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// First path segment reserved for framework-owned controllers
    #[serde(default = "default_internal_prefix")]
    pub internal_prefix: String,

    /// Leading token of CLI input
    #[serde(default = "default_cli_prefix")]
    pub cli_prefix: String,

    /// Load the registry snapshot at start instead of scanning
    #[serde(default = "default_false")]
    pub use_route_cache: bool,

    /// Snapshot location used by the file store
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// How many times one request may be forwarded
    #[serde(default = "default_max_forwards")]
    pub max_forwards: usize,
}

fn default_internal_prefix() -> String {
    "feast".to_string()
}

fn default_cli_prefix() -> String {
    "CLI".to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("storage/cache/routes.json")
}

fn default_max_forwards() -> usize {
    10
}

fn default_false() -> bool {
    false
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            internal_prefix: default_internal_prefix(),
            cli_prefix: default_cli_prefix(),
            use_route_cache: false,
            cache_path: default_cache_path(),
            max_forwards: default_max_forwards(),
        }
    }
}

impl RouterConfig {
    /// Load the `[router]` table from a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./feast.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("feast.toml")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(content)?;
        Ok(config.router)
    }
}
