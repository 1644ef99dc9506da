//! Bootstrap configuration
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (fallback)
//!
//! Command-line and environment handling lives in each binary (clap); this
//! module covers the TOML file and the built-in defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default number of similarity searches allowed to run at once
pub const DEFAULT_MAX_CONCURRENT_SEARCHES: usize = 5;

/// Default lifetime of a cached result page (6 hours)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 6 * 60 * 60;

/// Configuration loaded from the TOML file
///
/// Every field is optional in the file; missing fields take built-in defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite catalog database
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Capacity of the search admission gate
    #[serde(default = "default_max_concurrent_searches")]
    pub max_concurrent_searches: usize,

    /// Lifetime of cached result pages, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Sequence aliases: alias → sequence identifiers stored on songs
    ///
    /// Empty means "use the built-in registry".
    #[serde(default)]
    pub sequences: BTreeMap<String, Vec<String>>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_concurrent_searches() -> usize {
    DEFAULT_MAX_CONCURRENT_SEARCHES
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_path: None,
            max_concurrent_searches: default_max_concurrent_searches(),
            cache_ttl_secs: default_cache_ttl_secs(),
            sequences: BTreeMap::new(),
        }
    }
}

impl TomlConfig {
    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`
    ///
    /// A missing file is not an error: a warning is logged and defaults are
    /// returned. An unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file not found at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path, or from the platform default location
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) => Self::load(&path),
                None => {
                    warn!("Could not determine config directory, using built-in defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Cache lifetime as a `Duration`
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Database path from the file, or the platform default
    pub fn database_path_or_default(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrent_searches == 0 {
            return Err(Error::Config(
                "max_concurrent_searches must be at least 1".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(Error::Config("cache_ttl_secs must be at least 1".to_string()));
        }
        if let Some((alias, _)) = self.sequences.iter().find(|(_, ids)| ids.is_empty()) {
            return Err(Error::Config(format!(
                "sequence alias '{}' has no sequence identifiers",
                alias
            )));
        }
        Ok(())
    }
}

/// `<config dir>/deciframe/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("deciframe").join("config.toml"))
}

/// `<data dir>/deciframe/deciframe.db`, or `./deciframe.db` when the platform
/// has no data directory
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("deciframe").join("deciframe.db"))
        .unwrap_or_else(|| PathBuf::from("deciframe.db"))
}
