//! Status page CLI
//!
//! Command-line interface for the status page incident synchronization
//! service.

use std::path::PathBuf;

use clap::Parser;
use statuspage::{load_config, run};
use tracing::Level;

#[derive(Parser)]
#[command(name = "statuspage")]
#[command(about = "Status page incident synchronization service")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, log_level={:?}",
        args.config,
        args.log_level
    );

    let config = load_config(&args.config)?;

    tracing::info!("Starting status page service");
    tracing::debug!(
        "Remote page: {}, services with components: {}",
        config.page_id,
        config.components.len()
    );

    run(config).await?;

    Ok(())
}
