//! Gateway façade over the credential pool, request executor, response
//! cache, and stats persistence.
//!
//! This is the surface the rest of the product consumes: player lookups,
//! account existence checks, the operator stats view, and cache flushes.
//! One instance owns all shared state for its process lifetime.


use crate::cache::ResponseCache;
use crate::config::{ConfigError, GatewayConfig};
use crate::executor::{ApiError, RequestExecutor};
use crate::keypool::KeyPool;
use crate::player::{merge_player_stats, PlayerStats};
use crate::stats::{KeyUsageStats, SnapshotStore, StatsSnapshot, UsageTracker};
use chrono::Utc;
use dashmap::DashMap;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Read-only view of the gateway's current counters, for display.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayStats {
    pub total_requests: u64,
    pub error_count: u64,
    pub api_keys: usize,
    pub cache_size: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub requests_last_hour: u64,
    pub avg_response_time: f64,
    pub last_error: Option<String>,
    pub key_stats: Vec<KeyUsageStats>,
}

/// API access gateway for the FACEIT Open Data API.
///
/// Composes the credential pool, the rate-limit-aware executor, the
/// response cache, and stats persistence. Constructed once per process;
/// the newest persisted snapshot seeds the counters, and a fresh snapshot
/// is appended at shutdown so operational history survives restarts.
pub struct Gateway {
    base_url: String,
    pool: Arc<KeyPool>,
    executor: RequestExecutor,
    cache: ResponseCache<PlayerStats>,
    usage: Arc<UsageTracker>,
    store: Arc<dyn SnapshotStore>,
    /// One async mutex per nickname currently being looked up, so
    /// concurrent duplicate lookups collapse onto a single upstream fetch.
    in_flight: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

impl Gateway {
    /// Build a gateway and seed its counters from the newest snapshot.
    ///
    /// Fails fast on configuration problems - most importantly an empty
    /// credential list. Snapshot loading is best-effort: a persistence
    /// failure is logged and construction continues with zero counters.
    pub async fn new(
        config: &GatewayConfig,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let pool = Arc::new(KeyPool::new(
            config.api.keys.clone(),
            Duration::from_secs(config.api.key_idle_threshold_seconds),
        ));
        let usage = Arc::new(UsageTracker::new());
        let executor = RequestExecutor::new(
            Client::new(),
            Arc::clone(&pool),
            Arc::clone(&usage),
            Duration::from_secs(config.api.request_timeout_seconds),
        );
        let cache = ResponseCache::new(
            Duration::from_secs(config.cache.ttl_seconds),
            config.cache.max_entries,
        );

        let gateway = Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            pool,
            executor,
            cache,
            usage,
            store,
            in_flight: DashMap::new(),
        };

        match gateway.store.load_latest().await {
            Ok(Some(snapshot)) => {
                gateway.usage.seed(&snapshot);
                gateway
                    .cache
                    .seed_counters(snapshot.cache_hits, snapshot.cache_misses);
                gateway.pool.seed_usage(&snapshot.key_stats);
                info!(
                    recorded_at = %snapshot.recorded_at,
                    total_requests = snapshot.total_requests,
                    "Seeded counters from persisted stats"
                );
            }
            Ok(None) => {
                info!("No persisted stats found, starting from defaults");
            }
            Err(e) => {
                error!(error = %e, "Failed to load persisted stats, starting from defaults");
            }
        }

        Ok(gateway)
    }

    /// Look up a player's merged profile and lifetime stats by nickname.
    ///
    /// Cache-first; `Ok(None)` means the nickname does not resolve to a
    /// player (a negative result, not an error). The secondary lifetime
    /// stats call is best-effort - its failure degrades to an empty stats
    /// object. Transport-class and rate-limit failures of the primary
    /// call propagate.
    pub async fn get_player_stats(
        &self,
        nickname: &str,
    ) -> Result<Option<PlayerStats>, ApiError> {
        let lock = self.lookup_lock(nickname);
        let _guard = lock.lock().await;

        let result = self.fetch_player_stats(nickname).await;

        drop(_guard);
        self.in_flight
            .remove_if(nickname, |_, entry| Arc::strong_count(entry) <= 2);
        result
    }

    async fn fetch_player_stats(&self, nickname: &str) -> Result<Option<PlayerStats>, ApiError> {
        if let Some(cached) = self.cache.get(nickname) {
            debug!(nickname, "Cache hit");
            return Ok(Some(cached));
        }

        let profile = self
            .executor
            .execute(&format!("{}/players?nickname={}", self.base_url, nickname))
            .await?;

        let player_id = match profile.get("player_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                debug!(nickname, "Player not found");
                return Ok(None);
            }
        };

        let lifetime_stats = match self
            .executor
            .execute(&format!(
                "{}/players/{}/stats/cs2",
                self.base_url, player_id
            ))
            .await
        {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(nickname, player_id, error = %e, "Lifetime stats fetch failed");
                None
            }
        };

        match merge_player_stats(profile, lifetime_stats) {
            Some(merged) => {
                self.cache.insert(nickname, merged.clone());
                Ok(Some(merged))
            }
            None => Ok(None),
        }
    }

    /// Whether a FACEIT account with this nickname exists.
    ///
    /// Unlike the lookup, transport-class errors propagate instead of
    /// collapsing to `false`, so "not found" stays distinguishable from
    /// "service degraded".
    pub async fn check_account_exists(&self, nickname: &str) -> Result<bool, ApiError> {
        let lock = self.lookup_lock(nickname);
        let _guard = lock.lock().await;

        let response = self
            .executor
            .execute(&format!("{}/players?nickname={}", self.base_url, nickname))
            .await;

        drop(_guard);
        self.in_flight
            .remove_if(nickname, |_, entry| Arc::strong_count(entry) <= 2);

        Ok(response?.get("player_id").is_some())
    }

    /// Basic profile by player id (uncached).
    pub async fn get_player_info(&self, player_id: &str) -> Result<Value, ApiError> {
        self.executor
            .execute(&format!("{}/players/{}", self.base_url, player_id))
            .await
    }

    /// Recent match history by player id (uncached).
    pub async fn get_player_history(
        &self,
        player_id: &str,
        limit: usize,
    ) -> Result<Value, ApiError> {
        self.executor
            .execute(&format!(
                "{}/players/{}/history?game=cs2&limit={}",
                self.base_url, player_id, limit
            ))
            .await
    }

    /// Per-match statistics (uncached).
    pub async fn get_match_stats(&self, match_id: &str) -> Result<Value, ApiError> {
        self.executor
            .execute(&format!("{}/matches/{}/stats", self.base_url, match_id))
            .await
    }

    /// Current counters, for display by the consuming layer.
    pub fn get_stats(&self) -> GatewayStats {
        GatewayStats {
            total_requests: self.usage.total_requests(),
            error_count: self.usage.error_count(),
            api_keys: self.pool.len(),
            cache_size: self.cache.len(),
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
            cache_hit_rate: self.cache.hit_rate(),
            requests_last_hour: self.usage.requests_last_hour(),
            avg_response_time: self.usage.avg_response_time(),
            last_error: self.usage.last_error(),
            key_stats: self.pool.usage_stats(),
        }
    }

    /// Operator-triggered cache flush.
    pub fn refresh_cache(&self) {
        self.cache.invalidate_all();
        info!("Response cache cleared");
    }

    /// Append a snapshot of the current counters to the store.
    ///
    /// Best-effort: a persistence failure is logged and swallowed, never
    /// surfaced to the request path.
    pub async fn save_stats(&self) {
        let snapshot = self.snapshot();
        match self.store.append(&snapshot).await {
            Ok(()) => {
                info!(
                    total_requests = snapshot.total_requests,
                    cache_hit_rate = snapshot.cache_hit_rate,
                    "Stats snapshot persisted"
                );
            }
            Err(e) => {
                error!(error = %e, "Failed to persist stats snapshot");
            }
        }
    }

    /// Persist a final snapshot before the process exits.
    pub async fn shutdown(&self) {
        self.save_stats().await;
    }

    fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.usage.total_requests(),
            error_count: self.usage.error_count(),
            cache_size: self.cache.len() as u64,
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
            cache_hit_rate: self.cache.hit_rate(),
            requests_last_hour: self.usage.requests_last_hour(),
            avg_response_time: self.usage.avg_response_time(),
            last_error: self.usage.last_error(),
            key_stats: self.pool.usage_stats(),
            recorded_at: Utc::now(),
        }
    }

    fn lookup_lock(&self, nickname: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.in_flight
            .entry(nickname.to_string())
            .or_default()
            .clone()
    }
}
