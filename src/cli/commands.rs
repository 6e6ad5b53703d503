//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extract paginated API collections into JSON objects
#[derive(Parser, Debug)]
#[command(name = "api-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Extraction config file (YAML or JSON); defaults to the built-in DummyJSON sources
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every source and write one JSON object per source
    Run {
        /// Object name prefix (default: YYYYMMDD_HHMMSS of the run)
        #[arg(long)]
        prefix: Option<String>,

        /// Output destination, overriding the config
        /// Supports: gs://bucket/path, memory://, /local/path
        #[arg(short, long)]
        output: Option<String>,

        /// Credentials file for the destination, overriding the config
        #[arg(long)]
        credentials: Option<PathBuf>,

        /// Sources to extract (comma-separated, empty = all)
        #[arg(long)]
        sources: Option<String>,

        /// Items per page, overriding the config
        #[arg(long)]
        limit: Option<u32>,

        /// Delay between page requests in milliseconds, overriding the config
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Validate the configuration
    Validate,

    /// List configured sources
    Sources,
}
