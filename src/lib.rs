//! faceit-gateway - rate-limit-aware access gateway for the FACEIT Open
//! Data API.
//!
//! The gateway owns a pool of API credentials, rotates them on rate
//! limits, caches lookup responses, and persists operational statistics
//! across restarts.

pub mod cache;
pub mod cli;
pub mod config;
pub mod executor;
pub mod gateway;
pub mod keypool;
pub mod logging;
pub mod player;
pub mod stats;
