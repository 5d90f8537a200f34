pub mod app;
pub mod coerce;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod format;
pub mod handlers;
pub mod insights;
pub mod merge;
pub mod models;
pub mod poller;
pub mod state;
pub mod stats;
pub mod trend;
pub mod ui;

pub use app::router;
pub use config::Settings;
pub use fetch::{load_fallback, ReportClient};
pub use poller::{poll_once, spawn_poller};
pub use state::{AppState, DashboardState};
pub use stats::build_derived_view;
