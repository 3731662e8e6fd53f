use anyhow::Context;
use pitstop_core::config::LayeredConfig;
use pitstop_core::dashboard::Dashboard;

use crate::page::PageRenderer;

/// Shared handler state: the pipeline (with its dataset cache), the page templates and the
/// resolved configuration
#[derive(Debug, Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
    pub pages: PageRenderer,
    pub config: LayeredConfig,
}

impl AppState {
    pub fn new(dashboard: Dashboard, config: LayeredConfig) -> anyhow::Result<Self> {
        let pages = PageRenderer::new().context("Failed to compile page templates")?;
        Ok(Self {
            dashboard,
            pages,
            config,
        })
    }

    /// State backed by the default HTTP/file data source
    pub fn from_config(config: LayeredConfig) -> anyhow::Result<Self> {
        let dashboard = Dashboard::from_config(&config).context("Failed to build data source")?;
        Self::new(dashboard, config)
    }
}
