//! Stats persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stats persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Append-only snapshot history file (JSON lines)
    pub snapshot_path: PathBuf,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("faceit-stats.jsonl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_config_defaults() {
        let config = StatsConfig::default();
        assert_eq!(config.snapshot_path, PathBuf::from("faceit-stats.jsonl"));
    }
}
