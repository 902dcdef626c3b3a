//! Error types for upstream API calls.

use thiserror::Error;

/// Errors that can occur while executing an upstream request.
///
/// "Player not found" is not represented here: the lookup path reports it
/// as `Ok(None)`, a negative result rather than a failure. Callers can map
/// variants onto user-facing behavior: `RateLimitExhausted`, `Timeout`,
/// and `Transport` mean "try again later", `Upstream` means the service is
/// degraded.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Every configured key answered 429 for this call.
    #[error("All API keys rate limited")]
    RateLimitExhausted,

    /// Upstream returned a non-429, non-2xx response.
    #[error("Upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Upstream body doesn't parse as the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// True for failures worth retrying later (transient by nature).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimitExhausted | ApiError::Transport(_) | ApiError::Timeout(_)
        )
    }
}
