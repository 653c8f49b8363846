//! Sable daemon — keeps an off-chain mirror of the tracked contracts.
//!
//! Startup order: connect and verify the chain node, open the ledger
//! store, backfill every event stream, reconcile entity state, then follow
//! the chain live until Ctrl-C.

mod config;
mod logging;

use clap::Parser;
use config::MirrorConfig;
use sable_chain::{ChainClient, ContractRegistry};
use sable_store_lmdb::LmdbStore;
use sable_sync::{HistoricSync, LiveSync, LiveSyncConfig, Reconciler};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sable-daemon", about = "Sable contract mirror daemon")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "./sable.toml", env = "SABLE_CONFIG")]
    config: PathBuf,

    /// Override the configured chain RPC URL.
    #[arg(long, env = "SABLE_RPC_URL")]
    rpc_url: Option<String>,

    /// Override the configured data directory.
    #[arg(long, env = "SABLE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(long, env = "SABLE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Override the live sync poll interval, in seconds.
    #[arg(long, env = "SABLE_POLL_INTERVAL_SECS")]
    poll_interval_secs: Option<u64>,

    /// Skip the post-backfill state reconciliation pass.
    #[arg(long, env = "SABLE_SKIP_RECONCILE")]
    skip_reconcile: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Backfill, reconcile and follow the chain until interrupted.
    Run,
    /// Backfill and reconcile once, then exit.
    Backfill,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = MirrorConfig::from_toml_file(&cli.config)?;
    if let Some(rpc_url) = cli.rpc_url {
        config.chain.rpc_url = rpc_url;
    }
    if let Some(data_dir) = cli.data_dir {
        config.store.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(secs) = cli.poll_interval_secs {
        config.sync.poll_interval_secs = secs;
    }
    if cli.skip_reconcile {
        config.sync.reconcile = false;
    }

    logging::init_logging(
        logging::LogFormat::parse(&config.log_format),
        &config.log_level,
    );

    let registry = ContractRegistry::from_config(&config.contracts)?;
    let client = Arc::new(ChainClient::connect(&config.chain, registry.clone()).await?);
    let store = LmdbStore::open(&config.store.data_dir, config.store.map_size_mb * 1024 * 1024)?;

    let historic = HistoricSync::new(Arc::clone(&client), store.clone(), registry.clone());
    let summary = historic.run().await?;
    if summary.failed_streams > 0 {
        tracing::warn!(
            failed = summary.failed_streams,
            "some streams did not complete backfill; live sync will retry them"
        );
    }

    if config.sync.reconcile {
        // Best effort: a failed pass leaves event-derived state in place.
        let reconciler = Reconciler::new(Arc::clone(&client), store.clone());
        if let Err(err) = reconciler.run().await {
            tracing::warn!(%err, "reconciliation failed; continuing with event-derived state");
        }
    }

    if matches!(cli.command, Command::Backfill) {
        tracing::info!("backfill complete");
        return Ok(());
    }

    let handle = LiveSync::new(client, Arc::new(store), Arc::new(registry))
        .with_config(LiveSyncConfig {
            poll_interval: Duration::from_secs(config.sync.poll_interval_secs),
            shutdown_grace: Duration::from_secs(config.sync.shutdown_grace_secs),
        })
        .start();

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received — stopping live sync");
    handle.stop().await;

    tracing::info!("sable daemon exited cleanly");
    Ok(())
}
