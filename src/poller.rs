use crate::fetch::ReportClient;
use crate::models::RawReport;
use crate::state::DashboardState;
use crate::stats::build_derived_view;
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, warn};

/// Fetches one report and rebuilds the dashboard from it.
///
/// A failed fetch swaps in `fallback` and records the error; the derived
/// view is recomputed from whichever report ends up current.
pub async fn poll_once(
    client: &ReportClient,
    fallback: &RawReport,
    dashboard: &Mutex<DashboardState>,
) {
    let (report, error) = match client.fetch().await {
        Ok(report) => {
            debug!(url = client.url(), "fetched live report");
            (report, None)
        }
        Err(err) => {
            warn!(url = client.url(), "live fetch failed, using fallback report: {err}");
            (fallback.clone(), Some(err.to_string()))
        }
    };

    let derived = build_derived_view(Some(&report));

    let mut state = dashboard.lock().await;
    state.is_fallback = error.is_some();
    state.last_error = error;
    state.last_fetch = Some(Utc::now());
    state.current_report = Some(report);
    state.derived = derived;
}

/// Polls immediately, then every `every`. Failures never end the loop.
pub fn spawn_poller(
    client: ReportClient,
    fallback: RawReport,
    dashboard: Arc<Mutex<DashboardState>>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            poll_once(&client, &fallback, &dashboard).await;
        }
    })
}
