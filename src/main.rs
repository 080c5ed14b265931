//! txnweb main entry point

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use txnweb_api::start_server;
use txnweb_config::{Config, ConfigError};
use txnweb_core::{open_store, SystemClock, TransactionService};

#[derive(Parser, Debug)]
#[command(name = "txnweb")]
#[command(version = "0.1.0")]
#[command(about = "A small record-keeping service for customer transactions", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

/// Load the config file, falling back to defaults when it does not exist.
/// The flag reports whether the fallback was taken.
fn load_config(path: &Path) -> anyhow::Result<(Config, bool)> {
    match Config::load(path) {
        Ok(config) => Ok((config, false)),
        Err(ConfigError::FileNotFound { .. }) => Ok((Config::default(), true)),
        Err(e) => bail!("Failed to load configuration:\n{}", e.to_details()),
    }
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, defaulted) = load_config(&args.config)?;
    init_logging(&config.logging.level);

    if defaulted {
        log::warn!(
            "Config file {} not found, using built-in defaults",
            args.config.display()
        );
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }
    log::info!(
        "Storage backend: {} ({})",
        config.storage.backend,
        config.storage.path.display()
    );

    let rt = Runtime::new().context("Failed to start async runtime")?;

    rt.block_on(async {
        let store = open_store(&config.storage).await.with_context(|| {
            format!(
                "Failed to open {} transaction store at {}",
                config.storage.backend,
                config.storage.path.display()
            )
        })?;
        log::info!("{} transactions available", store.count().await?);
        let service = TransactionService::new(store, Arc::new(SystemClock));

        start_server(config, service).await.context("Server error")
    })
}
