mod request;
mod response;

pub use request::DashboardQuery;
pub use response::{BasemapInfo, CircuitsResponse, HealthResponse};
