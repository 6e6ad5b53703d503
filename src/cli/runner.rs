//! CLI runner - executes commands

use crate::builtin;
use crate::cli::commands::{Cli, Commands};
use crate::config::{load_config, ExtractConfig};
use crate::error::Result;
use crate::extractor::{ExtractSummary, Extractor};
use serde_json::json;
use std::path::PathBuf;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

/// Overrides `run` applies on top of the loaded config
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Destination URL
    pub output: Option<String>,
    /// Credentials file
    pub credentials: Option<PathBuf>,
    /// Comma-separated source names
    pub sources: Option<String>,
    /// Items per page
    pub limit: Option<u32>,
    /// Inter-request delay in milliseconds
    pub delay_ms: Option<u64>,
}

impl RunOverrides {
    /// Apply the overrides and re-validate the config
    pub fn apply(&self, config: &mut ExtractConfig) -> Result<()> {
        if let Some(output) = &self.output {
            config.destination = Some(output.clone());
        }
        if let Some(credentials) = &self.credentials {
            config.credentials_path = Some(credentials.clone());
        }
        if let Some(limit) = self.limit {
            config.pagination.limit = limit;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.pagination.delay_ms = delay_ms;
        }
        if let Some(sources) = &self.sources {
            let names: Vec<&str> = sources
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if !names.is_empty() {
                config.retain_sources(&names)?;
            }
        }
        config.validate()
    }
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                prefix,
                output,
                credentials,
                sources,
                limit,
                delay_ms,
            } => {
                let overrides = RunOverrides {
                    output: output.clone(),
                    credentials: credentials.clone(),
                    sources: sources.clone(),
                    limit: *limit,
                    delay_ms: *delay_ms,
                };
                self.extract(prefix.as_deref(), &overrides).await
            }
            Commands::Validate => self.validate(),
            Commands::Sources => self.sources(),
        }
    }

    /// Load the config file, or the built-in sources when none is given
    fn load_config(&self) -> Result<ExtractConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => builtin::dummyjson(),
        }
    }

    /// Run an extraction and print one JSON line per source
    async fn extract(&self, prefix: Option<&str>, overrides: &RunOverrides) -> Result<()> {
        let mut config = self.load_config()?;
        overrides.apply(&mut config)?;

        let extractor = Extractor::from_config(&config)?;
        let prefix = prefix.or(config.prefix.as_deref());
        let summary = extractor.extract_and_save(&config.sources, prefix).await;

        print_summary(&summary);
        Ok(())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;

        println!(
            "{}",
            json!({
                "status": "valid",
                "sources": config.sources.len(),
                "destination": config.destination,
                "limit": config.pagination.limit,
                "delay_ms": config.pagination.delay_ms,
                "max_pages": config.pagination.max_pages,
                "max_items": config.pagination.max_items,
            })
        );
        Ok(())
    }

    /// List configured sources
    fn sources(&self) -> Result<()> {
        let config = self.load_config()?;
        for source in &config.sources {
            println!(
                "{}",
                json!({
                    "name": source.name,
                    "url": source.url,
                    "records_path": source.records_path,
                })
            );
        }
        Ok(())
    }
}

fn print_summary(summary: &ExtractSummary) {
    for outcome in &summary.outcomes {
        println!(
            "{}",
            json!({
                "type": "SOURCE",
                "name": outcome.name,
                "object": outcome.object_name,
                "items": outcome.items,
                "pages": outcome.pages,
                "partial": outcome.is_partial(),
                "saved": outcome.saved,
                "error": outcome.error,
            })
        );
    }
    println!(
        "{}",
        json!({
            "type": "SUMMARY",
            "prefix": summary.prefix,
            "sources": summary.outcomes.len(),
            "saved": summary.saved(),
            "failed": summary.failed(),
            "items": summary.total_items(),
            "duration_ms": summary.duration_ms,
        })
    );
}
