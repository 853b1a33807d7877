//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Lookout Janitor - retention sweep for the Lookout time-series store.
#[derive(Debug, Parser)]
#[command(name = "lookout-janitor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LOOKOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database path (overrides the configuration file)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Run a single sweep, print its report as JSON, and exit
    #[arg(long)]
    pub once: bool,
}
