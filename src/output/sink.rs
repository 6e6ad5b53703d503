//! JSON sink
//!
//! Serializes one collection to pretty-printed JSON and hands it to the
//! destination. Failures are logged and reported as `false`.

use super::cloud::CloudDestination;
use crate::error::Result;
use crate::types::Item;
use bytes::Bytes;
use tracing::{error, info, warn};

/// Writes aggregated collections as single JSON objects
#[derive(Debug, Clone, Default)]
pub struct JsonSink {
    destination: Option<CloudDestination>,
}

impl JsonSink {
    /// Create a sink writing to `destination`; `None` drops every write
    pub fn new(destination: Option<CloudDestination>) -> Self {
        Self { destination }
    }

    /// Create a sink with no destination
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether a destination is configured
    pub fn has_destination(&self) -> bool {
        self.destination.is_some()
    }

    /// Get the destination, if any
    pub fn destination(&self) -> Option<&CloudDestination> {
        self.destination.as_ref()
    }

    /// Serialize items as an indented JSON array
    pub fn serialize(items: &[Item]) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec_pretty(items)?))
    }

    /// Serialize and write `items` as `filename`; returns whether the write succeeded
    pub async fn save(&self, items: &[Item], filename: &str, content_type: &str) -> bool {
        let Some(destination) = &self.destination else {
            warn!("No destination configured. Skipping upload of {filename}");
            return false;
        };

        match self.write(destination, items, filename, content_type).await {
            Ok(location) => {
                info!("Successfully uploaded {filename} to {location}");
                true
            }
            Err(e) => {
                error!("Error uploading {filename}: {e}");
                false
            }
        }
    }

    async fn write(
        &self,
        destination: &CloudDestination,
        items: &[Item],
        filename: &str,
        content_type: &str,
    ) -> Result<String> {
        let data = Self::serialize(items)?;
        destination.write(filename, data, content_type).await
    }
}
