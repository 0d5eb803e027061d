//! CLI argument parsing for dropsearch-tui.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dropsearch-tui")]
#[command(about = "Search dropdown over one or more indices", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging (logs to /tmp/dropsearch-tui.log)
    #[arg(short, long)]
    pub debug: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive dropdown (default)
    Tui,

    /// One-shot search query, printed as plain text
    Query {
        /// Search query
        query: String,
    },

    /// Validate the config and backend, then exit
    Check,

    /// Write a default config file to the config directory if none exists
    Init,
}
