use pitstop_core::dashboard::DashboardRequest;
use pitstop_core::map::Basemap;
use serde::Deserialize;

/// Query string shared by the page, map and dashboard endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub basemap: Option<String>,
    pub circuit: Option<String>,
}

impl DashboardQuery {
    /// Parse the basemap; an absent or blank value means "use the configured default"
    pub fn basemap(&self) -> pitstop_core::Result<Option<Basemap>> {
        match self.basemap.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }

    pub fn circuit(&self) -> Option<&str> {
        self.circuit.as_deref()
    }

    pub fn to_request(&self) -> pitstop_core::Result<DashboardRequest> {
        Ok(DashboardRequest {
            circuit: self.circuit.clone(),
            basemap: self.basemap()?,
        })
    }
}
