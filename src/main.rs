use clap::Parser;
use faceit_gateway::cli::{self, Cli, Commands};
use faceit_gateway::config::GatewayConfig;
use faceit_gateway::gateway::Gateway;
use faceit_gateway::logging;
use faceit_gateway::stats::JsonlSnapshotStore;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GatewayConfig::load(cli.config.as_deref())?.with_env_overrides();

    if let Err(e) = logging::init_tracing(&config.logging) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let store = Arc::new(JsonlSnapshotStore::new(config.stats.snapshot_path.clone()));
    let gateway = Gateway::new(&config, store).await?;

    let outcome = match &cli.command {
        Commands::Lookup(args) => cli::handle_lookup(&gateway, args).await,
        Commands::Exists(args) => cli::handle_exists(&gateway, args).await,
        Commands::Stats(args) => {
            cli::handle_stats(&gateway, args);
            Ok(())
        }
        Commands::Flush => {
            cli::handle_flush(&gateway);
            Ok(())
        }
    };

    // Persist counters even when the command itself failed
    gateway.shutdown().await;
    outcome
}
