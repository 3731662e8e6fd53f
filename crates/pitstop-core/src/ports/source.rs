use async_trait::async_trait;

use crate::error::Result;

/// Port for retrieving raw dataset content from a location (URL or path)
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the full textual content stored at `location`
    ///
    /// Implementations return `PitstopError::DataUnavailable` when the location cannot be
    /// reached or does not hold readable text.
    async fn fetch(&self, location: &str) -> Result<String>;

    /// Short adapter name used in logs
    fn name(&self) -> &str;
}
