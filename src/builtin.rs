//! Built-in source set embedded in the binary
//!
//! Used when the CLI is run without `--config`.

use crate::config::{load_config_from_str, ExtractConfig};
use crate::error::Result;

/// DummyJSON carts, users and products
pub const DUMMYJSON_YAML: &str = include_str!("../configs/dummyjson.yaml");

/// Load the built-in DummyJSON configuration
pub fn dummyjson() -> Result<ExtractConfig> {
    load_config_from_str(DUMMYJSON_YAML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummyjson_config() {
        let config = dummyjson().unwrap();
        let names: Vec<&str> = config.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["carts", "users", "products"]);
        assert!(config.destination.is_none());
        assert_eq!(config.pagination.limit, 30);
        assert_eq!(config.pagination.delay_ms, 500);
        for source in &config.sources {
            assert_eq!(source.records_path.as_deref(), Some(source.name.as_str()));
        }
    }
}
