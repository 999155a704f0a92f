//! TOML Configuration File Support
//!
//! Centralized configuration loading for the resolver, supporting a
//! TOML file at `~/.config/kompass/kompass.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! A missing config file is not an error (defaults are used); a
//! malformed one is.
//!
//! # Example Configuration
//!
//! ```toml
//! [[providers]]
//! name = "OSRM-Main"
//! base_url = "https://router.project-osrm.org/route/v1"
//! priority = 1
//!
//! [offline]
//! base_url = "http://localhost:5000"
//! probe_timeout_secs = 3
//!
//! [cache]
//! capacity = 200
//! ttl_secs = 86400
//!
//! [batch]
//! size = 5
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
use crate::metrics::DEFAULT_METRICS_CAPACITY;
use crate::probe::DEFAULT_PROBE_TIMEOUT;
use crate::providers::ProviderDescriptor;

/// Default concurrency ceiling for batch resolution.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// User-Agent sent with every outbound request.
pub const DEFAULT_USER_AGENT: &str = "kompass/0.1";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Runtime configuration for a [`RouteResolver`](crate::RouteResolver).
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Online providers; attempted in ascending priority.
    pub providers: Vec<ProviderDescriptor>,
    /// Root URL of the local routing daemon.
    pub offline_base_url: String,
    /// Probe timeout for the local daemon.
    pub probe_timeout: Duration,
    /// Maximum cached routes.
    pub cache_capacity: usize,
    /// Cached route time-to-live.
    pub cache_ttl: Duration,
    /// Metric ring buffer capacity.
    pub metrics_capacity: usize,
    /// Destinations resolved concurrently per batch chunk.
    pub batch_size: usize,
    /// User-Agent for outbound requests.
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                ProviderDescriptor::new("OSRM-Main", "https://router.project-osrm.org/route/v1", 1),
                ProviderDescriptor::new("OSRM-Alt", "https://osrm.router.place/route/v1", 2),
                ProviderDescriptor::new(
                    "OSRM-DE",
                    "https://routing.openstreetmap.de/routed-car/route/v1",
                    3,
                ),
                ProviderDescriptor::new("Valhalla", "https://valhalla1.openstreetmap.de", 4),
                ProviderDescriptor::new("GraphHopper", "https://graphhopper.com/api/1", 5),
            ],
            offline_base_url: "http://localhost:5000".to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: DEFAULT_CACHE_TTL,
            metrics_capacity: DEFAULT_METRICS_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Offline daemon section of the TOML configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineToml {
    /// Root URL of the local routing daemon.
    pub base_url: Option<String>,
    /// Probe timeout in seconds.
    pub probe_timeout_secs: Option<u64>,
}

/// Cache section of the TOML configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheToml {
    /// Maximum cached routes.
    pub capacity: Option<usize>,
    /// Entry time-to-live in seconds.
    pub ttl_secs: Option<u64>,
}

/// Batch section of the TOML configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchToml {
    /// Destinations resolved concurrently per chunk.
    pub size: Option<usize>,
}

/// Top-level TOML configuration structure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KompassToml {
    /// Provider table; an empty list keeps the built-in defaults.
    pub providers: Vec<ProviderDescriptor>,
    /// Offline daemon section.
    pub offline: OfflineToml,
    /// Cache section.
    pub cache: CacheToml,
    /// Batch section.
    pub batch: BatchToml,
}

/// Get the default configuration file path
/// (`$XDG_CONFIG_HOME/kompass/kompass.toml`).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("kompass").join("kompass.toml"))
}

/// Load configuration from the default path, then apply environment
/// overrides.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or
/// parsed. A missing file is not an error.
pub fn load_config() -> Result<ResolverConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then apply environment
/// overrides.
///
/// # Errors
///
/// Returns an error if the specified config file exists but cannot be
/// read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ResolverConfig, ConfigError> {
    let mut config = ResolverConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: KompassToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, toml_config);

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
        }
    }

    apply_env_config(&mut config);

    Ok(config)
}

/// Apply TOML values to the config struct.
fn apply_toml_config(config: &mut ResolverConfig, toml: KompassToml) {
    if !toml.providers.is_empty() {
        config.providers = toml.providers;
    }
    if let Some(base_url) = toml.offline.base_url {
        config.offline_base_url = base_url;
    }
    if let Some(secs) = toml.offline.probe_timeout_secs {
        config.probe_timeout = Duration::from_secs(secs);
    }
    if let Some(capacity) = toml.cache.capacity {
        config.cache_capacity = capacity;
    }
    if let Some(secs) = toml.cache.ttl_secs {
        config.cache_ttl = Duration::from_secs(secs);
    }
    if let Some(size) = toml.batch.size {
        config.batch_size = size;
    }
}

/// Apply environment variable overrides.
fn apply_env_config(config: &mut ResolverConfig) {
    if let Ok(url) = std::env::var("KOMPASS_OFFLINE_URL") {
        config.offline_base_url = url;
    }
    if let Ok(capacity) = std::env::var("KOMPASS_CACHE_CAPACITY") {
        if let Ok(n) = capacity.parse::<usize>() {
            config.cache_capacity = n;
        }
    }
    if let Ok(ttl) = std::env::var("KOMPASS_CACHE_TTL_SECS") {
        if let Ok(secs) = ttl.parse::<u64>() {
            config.cache_ttl = Duration::from_secs(secs);
        }
    }
    if let Ok(size) = std::env::var("KOMPASS_BATCH_SIZE") {
        if let Ok(n) = size.parse::<usize>() {
            config.batch_size = n;
        }
    }
}
