//! CLI module
//!
//! Command-line interface for running extractions.
//!
//! # Commands
//!
//! - `run` - Fetch every source and write it to the destination
//! - `validate` - Check the configuration
//! - `sources` - List configured sources

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{RunOverrides, Runner};
