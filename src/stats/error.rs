//! Error types for stats persistence.

use thiserror::Error;

/// Errors that can occur while loading or saving stats snapshots.
///
/// These never cross the gateway boundary: persistence is best-effort and
/// failures are logged and swallowed by the caller.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Underlying storage I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be serialized.
    #[error("Snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
