//! Pagination types
//!
//! Configuration, per-page parsing and loop state for offset pagination.

use crate::error::{Error, Result};
use crate::types::Item;
use serde_json::Value;
use std::time::Duration;

/// Collection keys tried in order when a source has no explicit record path
pub const AUTO_COLLECTION_KEYS: [&str; 3] = ["products", "users", "carts"];

/// Key used when none of [`AUTO_COLLECTION_KEYS`] is present
pub const FALLBACK_COLLECTION_KEY: &str = "data";

/// Configuration for offset pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Number of items requested per page
    pub limit: u32,
    /// Pause between consecutive page requests
    pub delay: Duration,
    /// Maximum number of page requests per collection
    pub max_pages: Option<u32>,
    /// Maximum number of items per collection
    pub max_items: Option<usize>,
    /// Query parameter name for the page size
    pub limit_param: String,
    /// Query parameter name for the offset
    pub skip_param: String,
    /// Dot path to the declared total in each page
    pub total_path: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            limit: 30,
            delay: Duration::from_millis(500),
            max_pages: Some(10_000),
            max_items: None,
            limit_param: "limit".to_string(),
            skip_param: "skip".to_string(),
            total_path: "total".to_string(),
        }
    }
}

impl PaginationConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the inter-request delay
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set (or clear) the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set (or clear) the item cap
    #[must_use]
    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }
}

// ============================================================================
// Record location
// ============================================================================

/// Where the item array lives in a page body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordLocator {
    /// Try [`AUTO_COLLECTION_KEYS`] in order, then `data`, else an empty page
    #[default]
    Auto,
    /// Dot path that must be present and hold an array; `null` is an empty page
    Path(String),
}

impl RecordLocator {
    /// Create a path locator
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Remove the item array from `body`, returning it with the key it was found under
    fn take_items(&self, body: &mut Value) -> Result<(Vec<Item>, Option<String>)> {
        match self {
            RecordLocator::Auto => {
                let map = body.as_object_mut().ok_or_else(|| {
                    Error::record_extraction("$", "response body is not a JSON object")
                })?;

                let key = AUTO_COLLECTION_KEYS
                    .iter()
                    .find(|key| map.contains_key(**key))
                    .copied()
                    .or_else(|| {
                        map.contains_key(FALLBACK_COLLECTION_KEY)
                            .then_some(FALLBACK_COLLECTION_KEY)
                    });

                let Some(key) = key else {
                    return Ok((Vec::new(), None));
                };
                let items = into_items(map.get_mut(key).map(Value::take), key)?;
                Ok((items, Some(key.to_string())))
            }
            RecordLocator::Path(path) => {
                let value = take_path(body, path).ok_or_else(|| {
                    Error::record_extraction(path.clone(), "path not found in response")
                })?;
                let items = into_items(Some(value), path)?;
                Ok((items, Some(path.clone())))
            }
        }
    }
}

fn into_items(value: Option<Value>, key: &str) -> Result<Vec<Item>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::record_extraction(
            key,
            format!("expected an array, found {}", type_name(&other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Look up a dot-separated path (optionally prefixed with `$.`)
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.')
        .try_fold(value, |current, part| current.as_object()?.get(part))
}

fn take_path(value: &mut Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;
    for part in path.split('.') {
        current = current.as_object_mut()?.get_mut(part)?;
    }
    Some(current.take())
}

// ============================================================================
// Page response
// ============================================================================

/// One parsed page
#[derive(Debug, Clone, Default)]
pub struct PageResponse {
    /// Items in API order
    pub items: Vec<Item>,
    /// Declared total, 0 when absent or unparseable
    pub total: u64,
    /// Key or path the items were found under
    pub collection_key: Option<String>,
}

impl PageResponse {
    /// Parse a page body
    pub fn parse(mut body: Value, locator: &RecordLocator, total_path: &str) -> Result<Self> {
        let total = extract_path(&body, total_path)
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .unwrap_or(0);

        let (items, collection_key) = locator.take_items(&mut body)?;

        Ok(Self {
            items,
            total,
            collection_key,
        })
    }

    /// Whether the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Loop state
// ============================================================================

/// Why a collection stopped paging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page returned no items
    EmptyPage,
    /// Items fetched reached the declared total
    TotalReached,
    /// A request failed; items so far are kept
    TransportError,
}

/// Result of processing one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Request the page at this offset next
    Continue {
        /// Offset of the next page
        offset: u64,
    },
    /// Stop paging
    Done(StopReason),
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Offset of the next request
    pub offset: u64,
    /// Page requests that returned a body
    pub pages: u32,
    /// Items accumulated so far
    pub total_fetched: usize,
    /// Total declared by the most recent page
    pub last_total: u64,
    /// Set once pagination stops
    pub stop: Option<StopReason>,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Add offset
    pub fn add_offset(&mut self, amount: u32) {
        self.offset += u64::from(amount);
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: usize) {
        self.total_fetched += count;
    }

    /// Mark pagination as stopped
    pub fn finish(&mut self, reason: StopReason) {
        self.stop = Some(reason);
    }

    /// Is pagination complete?
    pub fn is_done(&self) -> bool {
        self.stop.is_some()
    }
}

/// Everything fetched for one collection
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Accumulated items in API order
    pub items: Vec<Item>,
    /// Number of pages that returned a body
    pub pages: u32,
    /// Why paging stopped
    pub stop: StopReason,
    /// Total declared by the last page
    pub reported_total: u64,
}

impl FetchOutcome {
    /// Whether paging ended on a failed request
    pub fn is_partial(&self) -> bool {
        self.stop == StopReason::TransportError
    }
}
