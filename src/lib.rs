//! # api-extract
//!
//! Fetches paginated collections from HTTP APIs and stores each aggregated
//! collection as a single JSON object in object storage.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use api_extract::config::load_config;
//! use api_extract::extractor::Extractor;
//!
//! #[tokio::main]
//! async fn main() -> api_extract::Result<()> {
//!     let config = load_config("extract.yaml")?;
//!     let extractor = Extractor::from_config(&config)?;
//!
//!     // Writes {prefix}_{name}_full.json for every source
//!     let summary = extractor.extract_and_save(&config.sources, None).await;
//!     println!("{} items saved", summary.total_items());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         Extractor                         │
//! │      for each source: fetch_paginated() → save()          │
//! └───────────────────────────────────────────────────────────┘
//!                │                               │
//! ┌──────────────┴──────────────┐ ┌──────────────┴──────────────┐
//! │      OffsetPaginator        │ │          JsonSink           │
//! ├─────────────────────────────┤ ├─────────────────────────────┤
//! │ ?limit=N&skip=M             │ │ pretty JSON array           │
//! │ stop: empty page / total    │ │ CloudDestination (gs://,    │
//! │ caps: max_pages, max_items  │ │   memory://, local path)    │
//! └─────────────────────────────┘ └─────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document error enum variants, then drop this allow

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client for page requests
pub mod http;

/// Offset pagination
pub mod pagination;

/// Object storage output
pub mod output;

/// Run configuration
pub mod config;

/// Built-in source definitions
pub mod builtin;

/// Source-by-source extraction
pub mod extractor;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{load_config, ExtractConfig, SourceConfig};
pub use extractor::{ExtractSummary, Extractor, SourceOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
