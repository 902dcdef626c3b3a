//! Durable operational statistics.
//!
//! Two halves: the ephemeral [`UsageTracker`] (atomic counters plus rolling
//! windows, shared by every in-flight lookup) and the durable
//! [`StatsSnapshot`] rows persisted through a [`SnapshotStore`]. The
//! gateway loads the newest snapshot at construction to seed its counters
//! and appends a fresh one at shutdown or on demand, so dashboards and
//! tuning survive restarts.

mod error;
mod snapshot;
mod store;
#[cfg(test)]
mod tests;
mod usage;

pub use error::PersistenceError;
pub use snapshot::{KeyUsageStats, StatsSnapshot};
pub use store::{JsonlSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use usage::{RequestSample, UsageTracker};
