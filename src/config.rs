//! Run configuration
//!
//! This module contains the structures an extraction run is configured with,
//! loaded from YAML (or JSON, by file extension).
//!
//! ```yaml
//! destination: gs://my-bucket
//! credentials_path: /secrets/service-account.json
//! pagination:
//!   limit: 30
//!   delay_ms: 500
//! sources:
//!   - name: products
//!     url: https://dummyjson.com/products
//!     records_path: products
//! ```

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::pagination::{PaginationConfig, RecordLocator};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete extraction configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Where objects are written (`gs://bucket[/prefix]`, `memory://`, or a
    /// local directory). `None` runs without a destination.
    #[serde(default)]
    pub destination: Option<String>,

    /// Service account / application credentials file for GCS
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,

    /// Object name prefix; defaults to the run timestamp
    #[serde(default)]
    pub prefix: Option<String>,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Pagination settings shared by all sources
    #[serde(default)]
    pub pagination: PaginationDef,

    /// Sources to extract, in order
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl ExtractConfig {
    /// Check the config for mistakes that would make every run fail
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::missing_field("sources"));
        }

        let mut seen = HashSet::new();
        for (idx, source) in self.sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                return Err(Error::invalid_value(
                    format!("sources[{idx}].name"),
                    "must not be empty",
                ));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(Error::invalid_value(
                    format!("sources[{idx}].name"),
                    format!("duplicate source name '{}'", source.name),
                ));
            }
            if source.url.trim().is_empty() {
                return Err(Error::invalid_value(
                    format!("sources[{idx}].url"),
                    "must not be empty",
                ));
            }
        }

        if self.pagination.limit == 0 {
            return Err(Error::invalid_value("pagination.limit", "must be at least 1"));
        }
        if self.pagination.max_pages == Some(0) {
            return Err(Error::invalid_value(
                "pagination.max_pages",
                "must be at least 1 (omit to disable the cap)",
            ));
        }

        Ok(())
    }

    /// Keep only the named sources, preserving the configured order
    pub fn retain_sources(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            if !self.sources.iter().any(|s| s.name == *name) {
                return Err(Error::config(format!("Unknown source: {name}")));
            }
        }
        self.sources.retain(|s| names.contains(&s.name.as_str()));
        Ok(())
    }
}

// ============================================================================
// Source Config
// ============================================================================

/// One paginated collection to extract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base endpoint URL (pagination parameters are appended)
    pub url: String,

    /// Logical name, used in the object name
    pub name: String,

    /// Dot path to the item array in each page (e.g. `products`, `data.items`).
    /// When omitted the well-known collection keys are tried in order.
    #[serde(default)]
    pub records_path: Option<String>,
}

impl SourceConfig {
    /// Create a source with automatic record location
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            records_path: None,
        }
    }

    /// Set an explicit record path
    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Record locator for this source
    pub fn locator(&self) -> RecordLocator {
        match &self.records_path {
            Some(path) => RecordLocator::path(path.clone()),
            None => RecordLocator::Auto,
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every page request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl From<&HttpConfig> for HttpClientConfig {
    fn from(config: &HttpConfig) -> Self {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(config.timeout_seconds));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &config.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Offset pagination settings as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationDef {
    /// Items requested per page
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Pause between page requests, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Maximum pages per source before the source fails
    #[serde(default = "default_max_pages")]
    pub max_pages: Option<u32>,

    /// Maximum items per source before the source fails
    #[serde(default)]
    pub max_items: Option<usize>,

    /// Query parameter carrying the page size
    #[serde(default = "default_limit_param")]
    pub limit_param: String,

    /// Query parameter carrying the offset
    #[serde(default = "default_skip_param")]
    pub skip_param: String,

    /// Dot path to the declared total count
    #[serde(default = "default_total_path")]
    pub total_path: String,
}

impl Default for PaginationDef {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
            max_items: None,
            limit_param: default_limit_param(),
            skip_param: default_skip_param(),
            total_path: default_total_path(),
        }
    }
}

fn default_limit() -> u32 {
    30
}

fn default_delay_ms() -> u64 {
    500
}

fn default_max_pages() -> Option<u32> {
    Some(10_000)
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_skip_param() -> String {
    "skip".to_string()
}

fn default_total_path() -> String {
    "total".to_string()
}

impl From<&PaginationDef> for PaginationConfig {
    fn from(def: &PaginationDef) -> Self {
        PaginationConfig {
            limit: def.limit,
            delay: Duration::from_millis(def.delay_ms),
            max_pages: def.max_pages,
            max_items: def.max_items,
            limit_param: def.limit_param.clone(),
            skip_param: def.skip_param.clone(),
            total_path: def.total_path.clone(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a config file; `.json` files are parsed as JSON, anything else as YAML
pub fn load_config(path: impl AsRef<Path>) -> Result<ExtractConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        }
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: ExtractConfig = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    config.validate()?;
    Ok(config)
}

/// Parse and validate a YAML config string
pub fn load_config_from_str(yaml: &str) -> Result<ExtractConfig> {
    let config: ExtractConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
