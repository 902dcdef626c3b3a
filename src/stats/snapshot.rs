use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Usage counters for a single credential, as persisted in a snapshot.
///
/// The identifier is the masked display form of the key, never the raw
/// token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyUsageStats {
    pub identifier: String,
    pub requests: u64,
    pub errors: u64,
    pub last_used: Option<DateTime<Utc>>,
}

/// One durable, timestamped rollup of the gateway's operational counters.
///
/// Snapshots are append-only history: a new row is written at shutdown or
/// on demand, and only the newest row is read back at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub cache_size: u64,
    #[serde(default)]
    pub cache_hits: u64,
    #[serde(default)]
    pub cache_misses: u64,
    #[serde(default)]
    pub cache_hit_rate: f64,
    #[serde(default)]
    pub requests_last_hour: u64,
    #[serde(default)]
    pub avg_response_time: f64,
    #[serde(default)]
    pub last_error: Option<String>,
    /// Per-key usage in pool order. Deserialized defensively: malformed or
    /// non-list content becomes an empty list rather than a load failure.
    #[serde(default, deserialize_with = "deserialize_key_stats")]
    pub key_stats: Vec<KeyUsageStats>,
    pub recorded_at: DateTime<Utc>,
}

/// Tolerant `key_stats` decoding.
///
/// Older rows stored the list as a JSON-encoded string column; anything
/// that is not a well-formed list of entries decodes to empty.
fn deserialize_key_stats<'de, D>(deserializer: D) -> Result<Vec<KeyUsageStats>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let value = match value {
        serde_json::Value::String(raw) => {
            serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json(key_stats: &str) -> String {
        format!(
            r#"{{"total_requests": 7, "key_stats": {}, "recorded_at": "2026-08-05T10:00:00Z"}}"#,
            key_stats
        )
    }

    #[test]
    fn test_key_stats_list_round_trip() {
        let snapshot = StatsSnapshot {
            total_requests: 1,
            error_count: 0,
            cache_size: 0,
            cache_hits: 0,
            cache_misses: 0,
            cache_hit_rate: 0.0,
            requests_last_hour: 0,
            avg_response_time: 0.0,
            last_error: None,
            key_stats: vec![KeyUsageStats {
                identifier: "abcde...vwxyz".to_string(),
                requests: 12,
                errors: 2,
                last_used: None,
            }],
            recorded_at: Utc::now(),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: StatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_malformed_key_stats_decodes_empty() {
        // A string column holding broken JSON must not fail the whole load
        let decoded: StatsSnapshot =
            serde_json::from_str(&snapshot_json(r#""{not json}""#)).unwrap();
        assert!(decoded.key_stats.is_empty());
        assert_eq!(decoded.total_requests, 7);
    }

    #[test]
    fn test_non_list_key_stats_decodes_empty() {
        let decoded: StatsSnapshot = serde_json::from_str(&snapshot_json("42")).unwrap();
        assert!(decoded.key_stats.is_empty());
    }

    #[test]
    fn test_string_encoded_key_stats_decodes() {
        let embedded = r#""[{\"identifier\":\"aaaaa...zzzzz\",\"requests\":3,\"errors\":1,\"last_used\":null}]""#;
        let decoded: StatsSnapshot = serde_json::from_str(&snapshot_json(embedded)).unwrap();
        assert_eq!(decoded.key_stats.len(), 1);
        assert_eq!(decoded.key_stats[0].requests, 3);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let decoded: StatsSnapshot =
            serde_json::from_str(r#"{"recorded_at": "2026-08-05T10:00:00Z"}"#).unwrap();
        assert_eq!(decoded.total_requests, 0);
        assert_eq!(decoded.cache_hit_rate, 0.0);
        assert!(decoded.key_stats.is_empty());
        assert!(decoded.last_error.is_none());
    }
}
