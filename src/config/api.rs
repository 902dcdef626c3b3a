//! Upstream API configuration

use serde::{Deserialize, Serialize};

/// Default base URL of the FACEIT Open Data API.
pub const DEFAULT_BASE_URL: &str = "https://open.faceit.com/data/v4";

/// Upstream API access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for all upstream endpoints (no trailing slash)
    pub base_url: String,
    /// Credential pool; at least one key is required to construct a gateway
    pub keys: Vec<String>,
    /// Per-request timeout for upstream calls
    pub request_timeout_seconds: u64,
    /// A key idle longer than this is preferred by the rotation policy
    pub key_idle_threshold_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            keys: Vec::new(),
            request_timeout_seconds: 10,
            key_idle_threshold_seconds: 300,
        }
    }
}
