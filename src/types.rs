//! Common types used throughout api-extract

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// A single fetched record, passed through unmodified
pub type Item = JsonValue;

/// Content type used for every written object
pub const JSON_CONTENT_TYPE: &str = "application/json";
