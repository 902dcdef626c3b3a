//! Response cache configuration

use serde::{Deserialize, Serialize};

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a cached lookup stays valid
    pub ttl_seconds: u64,
    /// Maximum number of cached lookups; LRU eviction beyond this
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            max_entries: 1000,
        }
    }
}
