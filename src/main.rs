use gamification_dashboard::{load_fallback, router, spawn_poller, AppState, ReportClient, Settings};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    let fallback = load_fallback(settings.fallback_path.as_deref()).await;
    let client = ReportClient::new(settings.api_url.clone(), settings.request_timeout)?;

    info!(
        url = %settings.api_url,
        refresh_secs = settings.refresh.as_secs(),
        theme = settings.theme.as_str(),
        "starting report poller"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let refresh = settings.refresh;
    let state = AppState::new(settings);
    let poller = spawn_poller(client, fallback, state.dashboard.clone(), refresh);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.abort();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
