//! Credential pool with load-aware key rotation.
//!
//! Tracks usage counters per API key and picks the best key for each
//! outbound call: a key idle past the configured threshold is preferred
//! (avoids starvation), otherwise the key with the lowest lifetime request
//! count wins (balances volume).

mod key;
#[cfg(test)]
mod tests;

pub use key::ApiKey;

use crate::stats::KeyUsageStats;
use chrono::{DateTime, Utc};
use std::sync::atomic::Ordering;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Shared pool of upstream API credentials.
///
/// The key list is fixed at construction; all mutation goes through the
/// per-key atomic counters, so `select_key` and `record_outcome` are safe
/// to call from any number of concurrent lookups.
#[derive(Debug)]
pub struct KeyPool {
    keys: Vec<ApiKey>,
    idle_threshold: Duration,
}

impl KeyPool {
    /// Build a pool from raw tokens.
    ///
    /// # Panics
    ///
    /// Panics if `tokens` is empty. Construction is gated by
    /// [`GatewayConfig::validate`](crate::config::GatewayConfig::validate),
    /// which rejects an empty key list before a pool is ever built.
    pub fn new(tokens: Vec<String>, idle_threshold: Duration) -> Self {
        assert!(!tokens.is_empty(), "key pool requires at least one key");
        Self {
            keys: tokens.into_iter().map(ApiKey::new).collect(),
            idle_threshold,
        }
    }

    /// Pick the credential to use for the next call.
    ///
    /// With a single configured key there is nothing to rotate. Otherwise a
    /// key idle longer than the threshold is preferred (longest-idle first;
    /// a never-used key counts as infinitely idle), falling back to the key
    /// with the lowest lifetime request count.
    pub fn select_key(&self) -> &ApiKey {
        if self.keys.len() == 1 {
            return &self.keys[0];
        }

        let now = epoch_secs();
        let threshold = self.idle_threshold.as_secs();

        let mut longest_idle: Option<(&ApiKey, u64)> = None;
        for key in &self.keys {
            let idle = match key.last_used.load(Ordering::SeqCst) {
                0 => u64::MAX,
                at => now.saturating_sub(at),
            };
            if idle > threshold && longest_idle.map_or(true, |(_, best)| idle > best) {
                longest_idle = Some((key, idle));
            }
        }
        if let Some((key, _)) = longest_idle {
            return key;
        }

        self.keys
            .iter()
            .min_by_key(|k| k.requests.load(Ordering::SeqCst))
            .expect("key pool is never empty")
    }

    /// Record the outcome of one request attempt against `key`.
    pub fn record_outcome(&self, key: &ApiKey, success: bool) {
        key.requests.fetch_add(1, Ordering::SeqCst);
        key.last_used.store(epoch_secs(), Ordering::SeqCst);
        if !success {
            key.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn keys(&self) -> &[ApiKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Per-key usage in pool order, with masked identifiers.
    pub fn usage_stats(&self) -> Vec<KeyUsageStats> {
        self.keys
            .iter()
            .map(|key| KeyUsageStats {
                identifier: key.masked(),
                requests: key.request_count(),
                errors: key.error_count(),
                last_used: key.last_used_at().and_then(epoch_to_datetime),
            })
            .collect()
    }

    /// Restore per-key counters from a persisted snapshot.
    ///
    /// Entries are matched by masked identifier; stats for keys no longer
    /// configured are ignored.
    pub fn seed_usage(&self, stats: &[KeyUsageStats]) {
        for entry in stats {
            if let Some(key) = self.keys.iter().find(|k| k.masked() == entry.identifier) {
                key.requests.store(entry.requests, Ordering::SeqCst);
                key.errors.store(entry.errors, Ordering::SeqCst);
                let at = entry
                    .last_used
                    .map(|t| t.timestamp().max(0) as u64)
                    .unwrap_or(0);
                key.last_used.store(at, Ordering::SeqCst);
            }
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn epoch_to_datetime(secs: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs as i64, 0)
}
