use crate::config::Settings;
use crate::models::{DerivedView, RawReport};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Latest poll outcome. Only the poller writes it; handlers read snapshots.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub current_report: Option<RawReport>,
    pub derived: Option<DerivedView>,
    pub last_fetch: Option<DateTime<Utc>>,
    pub is_fallback: bool,
    pub last_error: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dashboard: Arc<Mutex<DashboardState>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            dashboard: Arc::new(Mutex::new(DashboardState::default())),
        }
    }
}
