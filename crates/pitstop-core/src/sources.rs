//! Data source adapters
//!
//! `RoutedSource` is what the binaries use: `http(s)://` locations go over the network, anything
//! else is read from the local filesystem. `StaticSource` serves fixed content for tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{PitstopError, Result};
use crate::ports::DataSource;

/// Fetches datasets over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a source whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            PitstopError::ConfigInvalid {
                key: "http_timeout_secs".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            }
        })?;
        Ok(Self { client })
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, location: &str) -> Result<String> {
        tracing::debug!(url = %location, "Fetching dataset over HTTP");

        let response = self.client.get(location).send().await.map_err(|e| {
            PitstopError::data_unavailable(location, format!("Request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(PitstopError::data_unavailable(
                location,
                format!("Server responded with {}", response.status()),
            ));
        }

        response.text().await.map_err(|e| {
            PitstopError::data_unavailable(location, format!("Failed to read response body: {}", e))
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Reads datasets from local paths or `file://` URLs
#[derive(Debug, Clone, Default)]
pub struct FileSource;

impl FileSource {
    fn resolve(location: &str) -> PathBuf {
        PathBuf::from(location.strip_prefix("file://").unwrap_or(location))
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch(&self, location: &str) -> Result<String> {
        let path = Self::resolve(location);
        tracing::debug!(path = %path.display(), "Reading dataset from disk");

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| PitstopError::data_unavailable(location, format!("Failed to read file: {}", e)))
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Dispatches by scheme: HTTP(S) to the network, everything else to disk
#[derive(Debug, Clone, Default)]
pub struct RoutedSource {
    http: HttpSource,
    file: FileSource,
}

impl RoutedSource {
    pub fn new(http: HttpSource) -> Self {
        Self {
            http,
            file: FileSource,
        }
    }

    /// Whether `location` would be fetched over the network
    pub fn is_remote(location: &str) -> bool {
        let lower = location.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

#[async_trait]
impl DataSource for RoutedSource {
    async fn fetch(&self, location: &str) -> Result<String> {
        if Self::is_remote(location) {
            self.http.fetch(location).await
        } else {
            self.file.fetch(location).await
        }
    }

    fn name(&self) -> &str {
        "routed"
    }
}

/// Serves fixed in-memory content keyed by location
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content for a location
    pub fn with_document(mut self, location: impl Into<String>, content: impl Into<String>) -> Self {
        self.documents.insert(location.into(), content.into());
        self
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch(&self, location: &str) -> Result<String> {
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| PitstopError::data_unavailable(location, "No document registered"))
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_detection() {
        assert!(RoutedSource::is_remote("https://raw.githubusercontent.com/x/f1.csv"));
        assert!(RoutedSource::is_remote("HTTP://example.com/f1.csv"));
        assert!(!RoutedSource::is_remote("/tmp/f1.csv"));
        assert!(!RoutedSource::is_remote("file:///tmp/f1.csv"));
    }

    #[test]
    fn test_file_url_resolution() {
        assert_eq!(FileSource::resolve("file:///tmp/data.csv"), PathBuf::from("/tmp/data.csv"));
        assert_eq!(FileSource::resolve("data/f1.csv"), PathBuf::from("data/f1.csv"));
    }

    #[tokio::test]
    async fn test_file_source_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f1_summary.csv");
        std::fs::write(&path, "circuit_name\nMonza Circuit\n").unwrap();

        let source = RoutedSource::default();
        let content = source.fetch(path.to_str().unwrap()).await.unwrap();
        assert!(content.contains("Monza Circuit"));

        let url = format!("file://{}", path.display());
        assert_eq!(FileSource.fetch(&url).await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_missing_file_is_data_unavailable() {
        let err = FileSource.fetch("/definitely/not/here.csv").await.unwrap_err();
        assert!(matches!(err, PitstopError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new().with_document("mem://circuits", "{}");

        assert_eq!(source.fetch("mem://circuits").await.unwrap(), "{}");
        assert!(source.fetch("mem://other").await.is_err());
    }
}
