//! Object storage destinations (GCS, in-memory, local filesystem)

use crate::error::{Error, Result, ResultExt};
use bytes::Bytes;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Storage destination parsed from a URL
#[derive(Debug, Clone)]
pub struct CloudDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket
    prefix: String,
    /// URL scheme (gs, memory, file)
    scheme: String,
    /// Human-readable root for log messages
    root: String,
}

impl CloudDestination {
    /// Parse a destination URL using ambient GCS credentials
    ///
    /// Supported formats:
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `memory://` - In-process store (dry runs)
    /// - `file:///local/path/`, `/local/path/` or `./path/` - Local filesystem
    ///
    /// Any other `scheme://` is rejected.
    pub fn parse(url: &str) -> Result<Self> {
        Self::parse_with_credentials(url, None)
    }

    /// Parse a destination URL, passing an explicit credentials file to GCS
    pub fn parse_with_credentials(url: &str, credentials_path: Option<&Path>) -> Result<Self> {
        if url.starts_with("gs://") {
            Self::parse_gcs(url, credentials_path)
        } else if url.starts_with("memory://") {
            Ok(Self::memory())
        } else if let Some(path) = url.strip_prefix("file://") {
            Self::parse_local(path)
        } else if let Some((scheme, _)) = url.split_once("://") {
            Err(Error::config(format!(
                "Unsupported destination scheme: {scheme}:// (expected gs://, memory://, file:// or a local path)"
            )))
        } else {
            Self::parse_local(url)
        }
    }

    /// Wrap an existing object store
    pub fn from_store(store: Arc<dyn ObjectStore>, scheme: impl Into<String>) -> Self {
        let scheme = scheme.into();
        Self {
            store,
            prefix: String::new(),
            root: format!("{scheme}://"),
            scheme,
        }
    }

    /// Create an in-memory destination
    pub fn memory() -> Self {
        Self::from_store(Arc::new(InMemory::new()), "memory")
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str, credentials_path: Option<&Path>) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("gs://")
            .ok_or_else(|| Error::config(format!("Invalid GCS URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].trim_end_matches('/').to_string(),
            ),
            None => (without_scheme, String::new()),
        };

        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in GCS URL: {url}")));
        }

        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        if let Some(path) = credentials_path {
            builder = builder.with_application_credentials(path.to_string_lossy());
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
            root: format!("gs://{bucket}"),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {path}"))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            root: path.trim_end_matches('/').to_string(),
        })
    }

    /// Get the scheme (gs, memory, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Get the underlying object store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Object path for a file name, including the destination prefix
    pub fn object_path(&self, filename: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(filename)
        } else {
            ObjectPath::from(format!("{}/{filename}", self.prefix))
        }
    }

    /// Write bytes under `filename`, returning the full location for logging
    ///
    /// The content type is stored as an object attribute where the backing
    /// store supports attributes; the local filesystem store does not.
    pub async fn write(&self, filename: &str, data: Bytes, content_type: &str) -> Result<String> {
        let path = self.object_path(filename);

        let mut opts = PutOptions::default();
        if self.scheme != "file" {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
            opts.attributes = attributes;
        }

        debug!("Writing {} bytes to {path}", data.len());
        self.store
            .put_opts(&path, PutPayload::from(data), opts)
            .await?;

        Ok(self.location(&path))
    }

    fn location(&self, path: &ObjectPath) -> String {
        if self.root.ends_with("://") {
            format!("{}{path}", self.root)
        } else {
            format!("{}/{path}", self.root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::AttributeValue;

    #[test]
    fn test_parse_memory() {
        let dest = CloudDestination::parse("memory://").unwrap();
        assert_eq!(dest.scheme(), "memory");
    }

    #[test]
    fn test_parse_local_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("exports");
        let dest = CloudDestination::parse(path.to_str().unwrap()).unwrap();
        assert_eq!(dest.scheme(), "file");
        assert!(path.is_dir());
    }

    #[test]
    fn test_parse_gcs_missing_bucket() {
        let err = CloudDestination::parse("gs://").unwrap_err();
        assert!(err.to_string().contains("Missing bucket"));
    }

    #[test]
    fn test_parse_unsupported_scheme() {
        for url in ["s3://my-bucket/exports", "gcs://my-bucket", "gss://bucket"] {
            let err = CloudDestination::parse(url).unwrap_err();
            assert!(matches!(err, Error::Config { .. }));
            assert!(err.to_string().contains("Unsupported destination scheme"));
        }
        assert!(!std::path::Path::new("s3:").exists());
        assert!(!std::path::Path::new("gcs:").exists());
    }

    #[test]
    fn test_parse_file_url() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("exports");
        let dest = CloudDestination::parse(&format!("file://{}", path.display())).unwrap();
        assert_eq!(dest.scheme(), "file");
        assert!(path.is_dir());
    }

    #[test]
    fn test_parse_local_blocked_by_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let err = CloudDestination::parse(blocker.join("exports").to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Other(_)));
        assert!(err.to_string().starts_with("Failed to create directory"));
    }

    #[tokio::test]
    async fn test_write_failure_is_object_store_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("blocker"), b"x").unwrap();
        let dest = CloudDestination::parse(temp_dir.path().to_str().unwrap()).unwrap();

        let err = dest
            .write("blocker/run_users_full.json", Bytes::from_static(b"[]"), "application/json")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ObjectStore(_)));
    }

    #[test]
    fn test_object_path_without_prefix() {
        let dest = CloudDestination::memory();
        assert_eq!(
            dest.object_path("20240101_000000_users_full.json").to_string(),
            "20240101_000000_users_full.json"
        );
    }

    #[tokio::test]
    async fn test_write_memory() {
        let dest = CloudDestination::memory();
        let location = dest
            .write("run_carts_full.json", Bytes::from_static(b"[]"), "application/json")
            .await
            .unwrap();
        assert_eq!(location, "memory://run_carts_full.json");

        let stored = dest
            .store()
            .get(&ObjectPath::from("run_carts_full.json"))
            .await
            .unwrap();
        assert_eq!(
            stored.attributes.get(&Attribute::ContentType),
            Some(&AttributeValue::from("application/json"))
        );
        assert_eq!(stored.bytes().await.unwrap(), Bytes::from_static(b"[]"));
    }

    #[tokio::test]
    async fn test_write_local() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dest = CloudDestination::parse(temp_dir.path().to_str().unwrap()).unwrap();

        let location = dest
            .write("run_users_full.json", Bytes::from_static(b"[1]"), "application/json")
            .await
            .unwrap();

        assert!(location.ends_with("/run_users_full.json"));
        let written = std::fs::read(temp_dir.path().join("run_users_full.json")).unwrap();
        assert_eq!(written, b"[1]");
    }
}
