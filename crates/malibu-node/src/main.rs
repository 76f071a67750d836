//! # Malibu Node Runtime
//!
//! Entry point for the malibu chain node. At this stage the runtime performs
//! the one step every other subsystem depends on: the genesis bootstrap.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration (from environment)
//! 3. Fetch the genesis document
//! 4. Parse, replay, and verify it
//! 5. Log the derived ledger summary and exit

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use malibu_genesis::{FileGenesisSource, GenesisBootstrap};

/// Node configuration, environment-driven.
struct NodeConfig {
    /// Path to the genesis document.
    genesis_path: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            genesis_path: "genesis.json".to_owned(),
        }
    }
}

/// Load configuration from the environment.
fn load_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    if let Ok(path) = std::env::var("MLB_GENESIS_PATH") {
        config.genesis_path = path;
    }
    config
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Malibu Node Runtime v0.1.0");
    info!("===========================================");

    let config = load_config();
    info!("Genesis document: {}", config.genesis_path);

    let source = FileGenesisSource::new(&config.genesis_path);
    let mut bootstrap = GenesisBootstrap::new();

    bootstrap
        .load_from(&source)
        .context("Failed to load genesis document")?;

    let block = bootstrap
        .block()
        .context("Genesis block missing after load")?;
    info!(
        "Genesis block: version={} timestamp={} magic={} transactions={}",
        block.version,
        block.timestamp,
        block.magic,
        block.transaction_in_blocks.len()
    );

    let ledger = bootstrap
        .apply()
        .context("Failed to apply genesis block")?;

    info!("Chain state initialized from genesis:");
    info!("  Accounts:  {}", ledger.account_count());
    info!("  Names:     {}", ledger.names.len());
    info!("  Factories: {}", ledger.factories.len());
    info!("  Total fee: {}", ledger.total_fee);
    info!("  Moved:     {}", ledger.total_moved);

    Ok(())
}
