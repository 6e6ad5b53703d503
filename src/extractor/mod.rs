//! Extraction orchestration
//!
//! # Overview
//!
//! The [`Extractor`] walks the configured sources one at a time: it pages
//! through each collection with the [`OffsetPaginator`], then hands the
//! aggregated items to the [`JsonSink`] as `{prefix}_{name}_full.json`.
//! A failing source is logged and skipped; the run always completes.

mod types;

pub use types::{ExtractSummary, SourceOutcome};

use crate::config::{ExtractConfig, SourceConfig};
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::{CloudDestination, JsonSink};
use crate::pagination::{FetchOutcome, OffsetPaginator, PaginationConfig};
use crate::types::{Item, JSON_CONTENT_TYPE};
use chrono::Local;
use std::time::Instant;
use tracing::{error, info, warn};

/// Timestamp prefix used when a run is not given one (`YYYYMMDD_HHMMSS`)
pub fn default_prefix() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Object name for a source: `{prefix}_{name}_full.json`
pub fn object_name(prefix: &str, source_name: &str) -> String {
    format!("{prefix}_{source_name}_full.json")
}

/// Fetches each source and writes it to the sink
#[derive(Debug)]
pub struct Extractor {
    client: HttpClient,
    paginator: OffsetPaginator,
    sink: JsonSink,
}

impl Extractor {
    /// Create an extractor from its parts
    pub fn new(client: HttpClient, paginator: OffsetPaginator, sink: JsonSink) -> Self {
        Self {
            client,
            paginator,
            sink,
        }
    }

    /// Build an extractor from a run configuration
    ///
    /// The destination (if any) is opened here, with the configured
    /// credentials file passed straight to the storage client.
    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        let client = HttpClient::with_config(HttpClientConfig::from(&config.http))?;
        let paginator = OffsetPaginator::new(PaginationConfig::from(&config.pagination));

        let destination = match &config.destination {
            Some(url) => Some(CloudDestination::parse_with_credentials(
                url,
                config.credentials_path.as_deref(),
            )?),
            None => None,
        };

        Ok(Self::new(client, paginator, JsonSink::new(destination)))
    }

    /// Get the sink
    pub fn sink(&self) -> &JsonSink {
        &self.sink
    }

    /// Get the paginator
    pub fn paginator(&self) -> &OffsetPaginator {
        &self.paginator
    }

    /// Fetch every page of one source
    pub async fn fetch_paginated(&self, source: &SourceConfig) -> Result<FetchOutcome> {
        self.paginator
            .fetch_all(&self.client, &source.url, &source.locator())
            .await
    }

    /// Write items through the sink; returns whether the write succeeded
    pub async fn save(&self, items: &[Item], filename: &str) -> bool {
        self.sink.save(items, filename, JSON_CONTENT_TYPE).await
    }

    /// Fetch and save one source
    pub async fn extract_source(&self, source: &SourceConfig, prefix: &str) -> Result<SourceOutcome> {
        let outcome = self.fetch_paginated(source).await?;
        let filename = object_name(prefix, &source.name);

        if outcome.is_partial() {
            warn!(
                "Source {} ended early after {} items; saving partial data",
                source.name,
                outcome.items.len()
            );
        }

        let saved = self.save(&outcome.items, &filename).await;

        Ok(SourceOutcome {
            name: source.name.clone(),
            object_name: filename,
            items: outcome.items.len(),
            pages: outcome.pages,
            stop: Some(outcome.stop),
            saved,
            error: None,
        })
    }

    /// Extract every source in order, then return a per-source summary
    ///
    /// Errors are logged per source and never abort the run.
    pub async fn extract_and_save(
        &self,
        sources: &[SourceConfig],
        prefix: Option<&str>,
    ) -> ExtractSummary {
        let start = Instant::now();
        let prefix = prefix.map_or_else(default_prefix, str::to_string);
        let mut summary = ExtractSummary::new(&prefix);

        if !self.sink.has_destination() {
            warn!("No destination configured; fetched data will not be stored");
        }

        for source in sources {
            info!("Extracting {} from {}", source.name, source.url);
            let outcome = match self.extract_source(source, &prefix).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Error processing {}: {e}", source.name);
                    SourceOutcome::failed(
                        &source.name,
                        object_name(&prefix, &source.name),
                        e.to_string(),
                    )
                }
            };
            summary.push(outcome);
        }

        summary.set_duration(start.elapsed().as_millis() as u64);
        info!(
            "Run {} finished: {} sources, {} saved, {} failed, {} items in {}ms",
            summary.prefix,
            summary.outcomes.len(),
            summary.saved(),
            summary.failed(),
            summary.total_items(),
            summary.duration_ms
        );
        summary
    }
}

#[cfg(test)]
mod tests;
