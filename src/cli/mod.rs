//! CLI module for the gateway
//!
//! Operator-facing commands over a single gateway instance. Each run
//! loads the newest persisted stats snapshot, performs its command, and
//! appends a fresh snapshot on the way out, so counters accumulate
//! across invocations.
//!
//! # Commands
//!
//! - `lookup` - Fetch a player's merged profile and lifetime stats
//! - `exists` - Check whether a FACEIT account exists
//! - `stats` - Show gateway usage statistics
//! - `flush` - Clear the response cache
//!
//! # Example
//!
//! ```bash
//! # Look up a player (keys from FACEIT_API_KEYS)
//! faceit-gateway lookup s1mple
//!
//! # Show usage counters as JSON
//! faceit-gateway stats --json
//! ```

pub mod output;

use crate::executor::ApiError;
use crate::gateway::Gateway;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// faceit-gateway - FACEIT Open Data API access gateway
#[derive(Parser, Debug)]
#[command(
    name = "faceit-gateway",
    version,
    about = "Rate-limit-aware access gateway for the FACEIT Open Data API"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a player's merged profile and lifetime stats
    Lookup(LookupArgs),
    /// Check whether a FACEIT account exists
    Exists(ExistsArgs),
    /// Show gateway usage statistics
    Stats(StatsArgs),
    /// Clear the response cache
    Flush,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Player nickname, case-sensitive
    pub nickname: String,

    /// Emit JSON instead of a human-readable block
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Player nickname, case-sensitive
    pub nickname: String,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Run a lookup and print the result.
///
/// Exits nonzero through the error return when the upstream is
/// unreachable or rate limited; an unknown nickname is reported but is
/// not an error.
pub async fn handle_lookup(gateway: &Gateway, args: &LookupArgs) -> anyhow::Result<()> {
    let result = gateway
        .get_player_stats(&args.nickname)
        .await
        .with_context(|| format!("lookup for '{}' failed", args.nickname))?;

    match result {
        Some(player) if args.json => println!("{}", output::format_player_json(&player)),
        Some(player) => print!("{}", output::format_player(&player)),
        None => println!("No FACEIT player named '{}'", args.nickname),
    }
    Ok(())
}

pub async fn handle_exists(gateway: &Gateway, args: &ExistsArgs) -> anyhow::Result<()> {
    match gateway.check_account_exists(&args.nickname).await {
        Ok(true) => {
            println!("Account '{}' exists", args.nickname);
            Ok(())
        }
        Ok(false) => {
            println!("No account named '{}'", args.nickname);
            Ok(())
        }
        Err(e @ ApiError::RateLimitExhausted) => {
            Err(anyhow::Error::new(e).context("upstream is rate limited, try again later"))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn handle_stats(gateway: &Gateway, args: &StatsArgs) {
    let stats = gateway.get_stats();
    if args.json {
        println!("{}", output::format_stats_json(&stats));
    } else {
        println!("{}", output::format_stats_table(&stats));
    }
}

pub fn handle_flush(gateway: &Gateway) {
    gateway.refresh_cache();
    println!("Response cache cleared");
}
