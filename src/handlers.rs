use crate::errors::AppError;
use crate::models::{DerivedView, RawReport, StatusResponse};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(render_index(&dashboard, &state.settings))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DerivedView>, AppError> {
    let dashboard = state.dashboard.lock().await;
    dashboard
        .derived
        .clone()
        .map(Json)
        .ok_or_else(|| AppError::unavailable("dashboard data has not been loaded yet"))
}

pub async fn get_report(State(state): State<AppState>) -> Result<Json<RawReport>, AppError> {
    let dashboard = state.dashboard.lock().await;
    dashboard
        .current_report
        .clone()
        .map(Json)
        .ok_or_else(|| AppError::unavailable("no report has been fetched yet"))
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(StatusResponse {
        is_fallback: dashboard.is_fallback,
        last_error: dashboard.last_error.clone(),
        last_fetch: dashboard.last_fetch.map(|stamp| stamp.to_rfc3339()),
        refresh_secs: state.settings.refresh.as_secs(),
        theme: state.settings.theme.as_str().to_string(),
    })
}
