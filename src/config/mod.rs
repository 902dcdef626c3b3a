//! Configuration module for the gateway
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. Environment variables (`FACEIT_*`)
//! 2. Configuration file (TOML)
//! 3. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use faceit_gateway::config::GatewayConfig;
//!
//! // Load defaults
//! let config = GatewayConfig::default();
//! assert_eq!(config.cache.max_entries, 1000);
//!
//! // Parse from TOML
//! let toml = r#"
//! [api]
//! keys = ["k-1"]
//! "#;
//! let config: GatewayConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.keys.len(), 1);
//! ```

pub mod api;
pub mod cache;
pub mod error;
pub mod logging;
pub mod stats;

pub use api::{ApiConfig, DEFAULT_BASE_URL};
pub use cache::CacheConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use stats::StatsConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the gateway.
///
/// Aggregates all configuration sections: upstream API access, response
/// caching, stats persistence, and logging.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Upstream API access (base URL, credential pool, timeouts)
    pub api: ApiConfig,
    /// Response cache bounds
    pub cache: CacheConfig,
    /// Stats snapshot persistence
    pub stats: StatsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports FACEIT_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(keys) = std::env::var("FACEIT_API_KEYS") {
            let keys: Vec<String> = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            if !keys.is_empty() {
                self.api.keys = keys;
            }
        }
        if let Ok(base_url) = std::env::var("FACEIT_API_BASE_URL") {
            self.api.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(path) = std::env::var("FACEIT_STATS_PATH") {
            self.stats.snapshot_path = path.into();
        }

        // Logging settings
        if let Ok(level) = std::env::var("FACEIT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FACEIT_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    ///
    /// An empty credential list is a fatal configuration error: the gateway
    /// must not run with zero usable keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.keys.is_empty() || self.api.keys.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::NoApiKeys);
        }
        if self.api.base_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: "base URL cannot be empty".to_string(),
            });
        }
        if self.api.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "api.request_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Validation {
                field: "cache.max_entries".to_string(),
                message: "cache capacity must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}
