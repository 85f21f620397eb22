//! Configuration settings for the search engine.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub reindex: ReindexConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("mercato.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("mercato/config.toml"))
                .unwrap_or_default(),
            PathBuf::from(shellexpand::tilde("~/.mercato/config.toml").as_ref()),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.index.base_url.is_empty() {
            return Err(ConfigError::MissingField("index.base_url".to_string()).into());
        }
        if self.index.index.is_empty() {
            return Err(ConfigError::MissingField("index.index".to_string()).into());
        }
        if self.index.retry.max_attempts == 0 {
            return Err(
                ConfigError::Invalid("index.retry.max_attempts must be > 0".to_string()).into(),
            );
        }
        if self.reindex.batch_size == 0 {
            return Err(ConfigError::Invalid("reindex.batch_size must be > 0".to_string()).into());
        }
        Ok(())
    }
}

/// External index connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Base URL of the index backend.
    pub base_url: String,
    /// Index name holding product documents.
    pub index: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for indexing writes.
    pub retry: RetryConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9200".to_string(),
            index: "products".to_string(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy for index writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempt budget (first try included).
    pub max_attempts: u32,
    /// Fixed wait between attempts, in seconds.
    pub wait_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait_secs: 5,
        }
    }
}

impl RetryConfig {
    /// Wait between attempts as a `Duration`.
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}

/// Bulk reindexing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReindexConfig {
    /// Documents per bulk request.
    pub batch_size: usize,
}

impl Default for ReindexConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

/// Result caps for the read paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result cap for similar-product queries.
    pub similar_limit: usize,
    /// Result cap for activity-based recommendations.
    pub recommendation_limit: usize,
    /// How many recent product ids seed a recommendation query.
    pub recommendation_seeds: usize,
    /// Result cap per autocomplete strategy.
    pub suggestion_limit: usize,
    /// Result cap for the combined autocomplete cascade.
    pub combined_suggestion_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similar_limit: 10,
            recommendation_limit: 10,
            recommendation_seeds: 5,
            suggestion_limit: 3,
            combined_suggestion_limit: 5,
        }
    }
}

/// Suggestion cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether suggestion caching is enabled.
    pub enabled: bool,
    /// Maximum cached entries.
    pub max_entries: u64,
    /// Entry time-to-live in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10_000,
            ttl_secs: 60,
        }
    }
}
