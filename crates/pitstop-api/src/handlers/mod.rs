mod basemaps;
mod circuits;
mod dashboard;
mod health;
mod page;

pub use basemaps::list_basemaps;
pub use circuits::{circuit_summary, list_circuits};
pub use dashboard::{get_dashboard, get_map};
pub use health::health_check;
pub use page::dashboard_page;
