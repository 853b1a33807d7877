//! Lookout Janitor - Main entry point

use anyhow::Context;
use clap::Parser;
use lookout_daemon::cli::Cli;
use lookout_daemon::config::DaemonConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    lookout_daemon::init_tracing(&config.log_level);

    lookout_daemon::run(config, cli.once)
        .await
        .context("Janitor daemon failed")
}
