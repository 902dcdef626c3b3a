//! Rate-limit-aware request executor.
//!
//! Issues authenticated GETs against the upstream API. A 429 response
//! rotates through the remaining keys in the pool until one answers with a
//! non-429 status; timing and outcome of every attempt feed the shared
//! [`UsageTracker`] and the per-key counters.

mod error;

pub use error::ApiError;

use crate::keypool::{ApiKey, KeyPool};
use crate::stats::{RequestSample, UsageTracker};
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Executes upstream GET requests with credential rotation on rate limits.
///
/// Cheap to clone pieces are shared: one reqwest client for connection
/// pooling, one key pool, one usage tracker.
pub struct RequestExecutor {
    client: Client,
    pool: Arc<KeyPool>,
    usage: Arc<UsageTracker>,
    timeout: Duration,
}

impl RequestExecutor {
    pub fn new(
        client: Client,
        pool: Arc<KeyPool>,
        usage: Arc<UsageTracker>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            pool,
            usage,
            timeout,
        }
    }

    /// Perform an authenticated GET and parse the JSON body.
    ///
    /// Every call bumps the global request counter and appends a timing
    /// sample; every failure lands in the rolling error log. See
    /// [`ApiError`] for the failure taxonomy.
    pub async fn execute(&self, url: &str) -> Result<Value, ApiError> {
        let started = Instant::now();
        self.usage.record_request();

        let result = self.execute_with_rotation(url).await;

        self.usage
            .record_sample(RequestSample::now(started.elapsed().as_secs_f64()));
        if let Err(e) = &result {
            self.usage
                .record_error(format!("Request to {} failed: {}", url, e));
        }

        result
    }

    async fn execute_with_rotation(&self, url: &str) -> Result<Value, ApiError> {
        let key = self.pool.select_key();

        let response = match self.send(url, key).await {
            Ok(response) => response,
            Err(e) => {
                self.pool.record_outcome(key, false);
                return Err(e);
            }
        };

        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            return self.consume(response, key).await;
        }

        warn!(key = %key.masked(), url, "Rate limit exceeded, rotating keys");
        self.pool.record_outcome(key, false);
        self.retry_other_keys(url, key).await
    }

    /// Walk every key except the one that just got rate limited, in pool
    /// order, until one answers with a non-429 status.
    async fn retry_other_keys(&self, url: &str, exhausted: &ApiKey) -> Result<Value, ApiError> {
        for key in self.pool.keys() {
            if std::ptr::eq(key, exhausted) {
                continue;
            }

            let response = match self.send(url, key).await {
                Ok(response) => response,
                Err(e) => {
                    self.pool.record_outcome(key, false);
                    return Err(e);
                }
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                warn!(key = %key.masked(), url, "Retry key also rate limited");
                self.pool.record_outcome(key, false);
                continue;
            }

            return self.consume(response, key).await;
        }

        Err(ApiError::RateLimitExhausted)
    }

    /// Record the outcome for `key` and turn the response into JSON.
    async fn consume(&self, response: Response, key: &ApiKey) -> Result<Value, ApiError> {
        let status = response.status();

        if !status.is_success() {
            self.pool.record_outcome(key, false);
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                self.pool.record_outcome(key, false);
                return Err(ApiError::Transport(e.to_string()));
            }
        };

        match serde_json::from_str(&body) {
            Ok(value) => {
                self.pool.record_outcome(key, true);
                debug!(key = %key.masked(), "Upstream request succeeded");
                Ok(value)
            }
            Err(e) => {
                self.pool.record_outcome(key, false);
                Err(ApiError::InvalidResponse(e.to_string()))
            }
        }
    }

    async fn send(&self, url: &str, key: &ApiKey) -> Result<Response, ApiError> {
        self.client
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", key.token()))
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    ApiError::Transport(e.to_string())
                }
            })
    }
}
